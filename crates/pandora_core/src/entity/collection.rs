//! Typed create/get/list/remove over one collection group.

use super::{Entity, EntityNode, NamedEntity, ATTR_NAME, ATTR_TYPE};
use crate::error::{PandoraError, PandoraResult};
use crate::store::Group;
use crate::util::check_name_or_id;
use crate::util::ids::fresh_id;
use log::{debug, error, warn};
use std::marker::PhantomData;

/// Accessor for all entities of kind `E` stored under one group.
///
/// # Invariants
/// - Each child node of `group` is one entity; its name is the entity id.
/// - `list()` and `get_at()` follow the storage enumeration order.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    group: Group,
    ctx: E::Context,
    _kind: PhantomData<E>,
}

impl<E: Entity> Collection<E> {
    pub(crate) fn new(group: Group, ctx: E::Context) -> Self {
        Self {
            group,
            ctx,
            _kind: PhantomData,
        }
    }

    /// Group holding the collection's nodes.
    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn has(&self, id: &str) -> PandoraResult<bool> {
        self.group.has_group(id)
    }

    pub fn count(&self) -> PandoraResult<usize> {
        self.group.object_count()
    }

    /// Loads the entity with `id`.
    ///
    /// # Errors
    /// - `NotFound` when no such entity exists in this collection.
    pub fn get(&self, id: &str) -> PandoraResult<E> {
        if !self.has(id)? {
            return Err(PandoraError::not_found(E::KIND, id));
        }
        let node = self.group.open_group(id, false)?;
        E::open(&self.ctx, EntityNode::new(node, id.to_string()))
    }

    /// Loads the entity at `index` in enumeration order.
    ///
    /// # Errors
    /// - `OutOfBounds` when `index >= count()`.
    pub fn get_at(&self, index: usize) -> PandoraResult<E> {
        let count = self.count()?;
        if index >= count {
            return Err(PandoraError::OutOfBounds {
                kind: E::KIND,
                index,
                count,
            });
        }
        let id = self.group.object_name(index)?;
        self.get(&id)
    }

    /// Ids of all entities in enumeration order.
    pub fn ids(&self) -> PandoraResult<Vec<String>> {
        self.group.object_names()
    }

    /// Materializes every entity of the collection.
    pub fn list(&self) -> PandoraResult<Vec<E>> {
        self.ids()?.iter().map(|id| self.get(id)).collect()
    }

    /// Entities accepted by `filter`, in enumeration order.
    pub fn list_filtered(&self, mut filter: impl FnMut(&E) -> bool) -> PandoraResult<Vec<E>> {
        let mut kept = Vec::new();
        for id in self.ids()? {
            let entity = self.get(&id)?;
            if filter(&entity) {
                kept.push(entity);
            }
        }
        Ok(kept)
    }

    /// Removes the entity with `id` and its whole subtree.
    ///
    /// Returns `false` without touching storage when `id` is absent.
    pub fn remove(&self, id: &str) -> PandoraResult<bool> {
        let removed = self.group.remove_group(id)?;
        if removed {
            debug!(
                "event=entity_remove module=entity status=ok kind={} id={id}",
                E::KIND
            );
        }
        Ok(removed)
    }

    /// Creates a node with a fresh id, stamps timestamps and runs `init`.
    ///
    /// A failing `init` removes the half-built node again.
    pub(crate) fn create_with(
        &self,
        init: impl FnOnce(&EntityNode) -> PandoraResult<()>,
    ) -> PandoraResult<E> {
        let id = fresh_id(E::ID_PREFIX, |candidate| self.group.has_object(candidate))?;
        let node = EntityNode::new(self.group.open_group(&id, true)?, id.clone());

        if let Err(err) = node.stamp_created().and_then(|()| init(&node)) {
            warn!(
                "event=entity_create module=entity status=error kind={} id={id} error={err}",
                E::KIND
            );
            if let Err(rollback_err) = self.group.remove_group(&id) {
                error!(
                    "event=entity_rollback module=entity status=error kind={} id={id} error={rollback_err}",
                    E::KIND
                );
            }
            return Err(err);
        }

        debug!(
            "event=entity_create module=entity status=ok kind={} id={id}",
            E::KIND
        );
        E::open(&self.ctx, node)
    }
}

impl<E: NamedEntity> Collection<E> {
    /// Creates a new entity named `name` of type `entity_type`.
    ///
    /// # Errors
    /// - `InvalidInput` when `name` is blank.
    pub fn create(&self, name: &str, entity_type: &str) -> PandoraResult<E> {
        self.create_named_with(name, entity_type, |_| Ok(()))
    }

    pub(crate) fn create_named_with(
        &self,
        name: &str,
        entity_type: &str,
        init: impl FnOnce(&EntityNode) -> PandoraResult<()>,
    ) -> PandoraResult<E> {
        check_name_or_id(name, "name")?;
        self.create_with(|node| {
            node.group().set_attr(ATTR_NAME, name)?;
            node.group().set_attr(ATTR_TYPE, entity_type)?;
            init(node)
        })
    }
}
