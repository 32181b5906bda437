//! Id references from one entity to entities of another collection.
//!
//! A reference list is a group whose children are empty nodes named after
//! the referenced ids. The list never owns its targets; resolution goes
//! through a caller-supplied lookup every time.

use crate::error::{PandoraError, PandoraResult};
use crate::store::Group;
use crate::util::check_name_or_id;
use log::debug;

/// Set of referenced ids, enumerated in storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceList {
    group: Group,
    kind: &'static str,
}

impl ReferenceList {
    /// Opens (creating if needed) the reference group `name` below `owner`.
    pub(crate) fn open(owner: &Group, name: &str, kind: &'static str) -> PandoraResult<Self> {
        Ok(Self {
            group: owner.open_group(name, true)?,
            kind,
        })
    }

    /// Kind of the referenced entities.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn has(&self, id: &str) -> PandoraResult<bool> {
        self.group.has_group(id)
    }

    pub fn count(&self) -> PandoraResult<usize> {
        self.group.object_count()
    }

    pub fn ids(&self) -> PandoraResult<Vec<String>> {
        self.group.object_names()
    }

    /// Id stored at `index`.
    ///
    /// # Errors
    /// - `OutOfBounds` when `index >= count()`.
    pub fn id_at(&self, index: usize) -> PandoraResult<String> {
        let count = self.count()?;
        if index >= count {
            return Err(PandoraError::OutOfBounds {
                kind: self.kind,
                index,
                count,
            });
        }
        self.group.object_name(index)
    }

    /// Resolves the reference with `id` through `resolve`.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not referenced, or when `resolve` cannot find
    ///   the target any more.
    pub fn get<T>(
        &self,
        id: &str,
        resolve: impl FnOnce(&str) -> PandoraResult<T>,
    ) -> PandoraResult<T> {
        if !self.has(id)? {
            return Err(PandoraError::not_found(self.kind, id));
        }
        resolve(id)
    }

    /// Resolves the reference at `index` through `resolve`.
    pub fn get_at<T>(
        &self,
        index: usize,
        resolve: impl FnOnce(&str) -> PandoraResult<T>,
    ) -> PandoraResult<T> {
        let id = self.id_at(index)?;
        resolve(&id)
    }

    /// Records `id` after `exists` confirmed the target is present.
    ///
    /// Adding an id that is already referenced is a no-op.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank id.
    /// - `NotFound` when `exists` reports the target missing.
    pub fn add(
        &self,
        id: &str,
        exists: impl FnOnce(&str) -> PandoraResult<bool>,
    ) -> PandoraResult<()> {
        check_name_or_id(id, "reference id")?;
        if !exists(id)? {
            return Err(PandoraError::not_found(self.kind, id));
        }
        if self.has(id)? {
            return Ok(());
        }
        self.group.open_group(id, true)?;
        debug!(
            "event=reference_add module=entity status=ok kind={} id={id}",
            self.kind
        );
        Ok(())
    }

    /// Drops the reference to `id`; returns whether it existed.
    pub fn remove(&self, id: &str) -> PandoraResult<bool> {
        self.group.remove_group(id)
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceList;
    use crate::store::Storage;
    use crate::PandoraError;

    fn list() -> ReferenceList {
        let root = Storage::in_memory().unwrap().root();
        ReferenceList::open(&root, "references", "data array").unwrap()
    }

    #[test]
    fn add_requires_existing_target() {
        let refs = list();
        let err = refs.add("data_array_x", |_| Ok(false)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(refs.count().unwrap(), 0);

        let err = refs.add("", |_| Ok(true)).unwrap_err();
        assert!(matches!(err, PandoraError::InvalidInput(_)));
    }

    #[test]
    fn add_is_idempotent_and_remove_reports_presence() {
        let refs = list();
        refs.add("data_array_a", |_| Ok(true)).unwrap();
        refs.add("data_array_a", |_| Ok(true)).unwrap();
        assert_eq!(refs.count().unwrap(), 1);
        assert_eq!(refs.id_at(0).unwrap(), "data_array_a");

        assert!(refs.remove("data_array_a").unwrap());
        assert!(!refs.remove("data_array_a").unwrap());
    }

    #[test]
    fn get_resolves_only_recorded_ids() {
        let refs = list();
        refs.add("data_array_a", |_| Ok(true)).unwrap();

        let resolved = refs.get("data_array_a", |id| Ok(id.len())).unwrap();
        assert_eq!(resolved, "data_array_a".len());
        assert!(refs.get("data_array_b", |id| Ok(id.len())).unwrap_err().is_not_found());

        let err = refs.get_at(1, |id| Ok(id.to_string())).unwrap_err();
        assert!(matches!(err, PandoraError::OutOfBounds { index: 1, count: 1, .. }));
    }
}
