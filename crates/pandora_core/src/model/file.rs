//! File handle: the entry point to blocks and the metadata forest.
//!
//! # Responsibility
//! - Open storage in one of the `FileMode`s and stamp/verify the root
//!   format attributes.
//! - Expose the block collection and the root-level section operations.
//!
//! # Invariants
//! - A file whose `format` attribute is set to anything but `pandora` is
//!   rejected on open.
//! - Removing a section removes every section that descends from it.

use super::block::Block;
use super::section::{Section, ATTR_PARENT, METADATA_GROUP};
use crate::entity::{Collection, SectionIter};
use crate::error::{PandoraError, PandoraResult};
use crate::store::{FileMode, Group, Storage};
use crate::util::now_epoch_ms;
use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;

pub const FORMAT_NAME: &str = "pandora";
pub const FORMAT_VERSION: &str = "1.0.0";

const DATA_GROUP: &str = "data";
const ATTR_FORMAT: &str = "format";
const ATTR_VERSION: &str = "version";
const ATTR_CREATED_AT: &str = "created_at";
const ATTR_UPDATED_AT: &str = "updated_at";

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    root: Group,
    data: Group,
    metadata: Group,
}

impl File {
    /// Opens the file at `path`.
    ///
    /// # Errors
    /// - `Db` when the file cannot be opened in `mode` (e.g. a missing file
    ///   in `ReadOnly`).
    /// - `InvalidData` when the file carries a foreign `format` attribute.
    pub fn open(path: impl AsRef<Path>, mode: FileMode) -> PandoraResult<Self> {
        Self::from_storage(Storage::open(path, mode)?)
    }

    /// Opens an empty file that lives only as long as its handles.
    pub fn in_memory() -> PandoraResult<Self> {
        Self::from_storage(Storage::in_memory()?)
    }

    fn from_storage(storage: Storage) -> PandoraResult<Self> {
        let root = storage.root();
        let writable = storage.mode() != FileMode::ReadOnly;

        match root.text_attr(ATTR_FORMAT)? {
            Some(format) if format != FORMAT_NAME => {
                return Err(PandoraError::InvalidData(format!(
                    "file format `{format}` is not `{FORMAT_NAME}`"
                )));
            }
            Some(_) => {}
            None if writable => {
                let now = now_epoch_ms();
                root.set_attr(ATTR_FORMAT, FORMAT_NAME)?;
                root.set_attr(ATTR_VERSION, FORMAT_VERSION)?;
                root.set_attr(ATTR_CREATED_AT, now)?;
                root.set_attr(ATTR_UPDATED_AT, now)?;
                info!("event=file_init module=model status=ok version={FORMAT_VERSION}");
            }
            None => {}
        }

        let data = root.open_group(DATA_GROUP, writable)?;
        let metadata = root.open_group(METADATA_GROUP, writable)?;
        Ok(Self {
            root,
            data,
            metadata,
        })
    }

    pub fn storage(&self) -> &Storage {
        self.root.storage()
    }

    pub fn mode(&self) -> FileMode {
        self.storage().mode()
    }

    pub fn format(&self) -> PandoraResult<Option<String>> {
        self.root.text_attr(ATTR_FORMAT)
    }

    pub fn version(&self) -> PandoraResult<Option<String>> {
        self.root.text_attr(ATTR_VERSION)
    }

    pub fn created_at(&self) -> PandoraResult<Option<i64>> {
        self.root.int_attr(ATTR_CREATED_AT)
    }

    pub fn blocks(&self) -> Collection<Block> {
        Collection::new(self.data.clone(), ())
    }

    /// Flat accessor over every section of the file, roots and children.
    pub fn all_sections(&self) -> Collection<Section> {
        Collection::new(self.metadata.clone(), self.metadata.clone())
    }

    pub fn has_section(&self, id: &str) -> PandoraResult<bool> {
        self.all_sections().has(id)
    }

    /// Loads a section at any depth of the metadata forest.
    pub fn get_section(&self, id: &str) -> PandoraResult<Section> {
        self.all_sections().get(id)
    }

    /// Number of root sections.
    pub fn section_count(&self) -> PandoraResult<usize> {
        let mut count = 0;
        for section in self.root_sections()? {
            section?;
            count += 1;
        }
        Ok(count)
    }

    /// Creates a root section.
    pub fn create_section(&self, name: &str, section_type: &str) -> PandoraResult<Section> {
        self.all_sections().create(name, section_type)
    }

    /// Lazy iterator over sections without a parent.
    pub fn root_sections(&self) -> PandoraResult<SectionIter> {
        SectionIter::new(self.metadata.clone(), "")
    }

    /// Root sections, collected eagerly.
    pub fn sections(&self) -> PandoraResult<Vec<Section>> {
        self.root_sections()?.collect()
    }

    /// Removes section `id` together with all of its descendants.
    ///
    /// Returns `false` when no section `id` exists.
    pub fn remove_section(&self, id: &str) -> PandoraResult<bool> {
        let sections = self.all_sections();
        if !sections.has(id)? {
            return Ok(false);
        }

        let mut doomed = HashSet::new();
        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if !doomed.insert(current.clone()) {
                continue;
            }
            for candidate in sections.ids()? {
                let parent = self
                    .metadata
                    .open_group(&candidate, false)?
                    .text_attr(ATTR_PARENT)?;
                if parent.as_deref() == Some(current.as_str()) {
                    pending.push(candidate);
                }
            }
        }

        for section_id in &doomed {
            sections.remove(section_id)?;
        }
        debug!(
            "event=section_remove module=model status=ok id={id} removed={}",
            doomed.len()
        );
        Ok(true)
    }
}
