//! Depth-first search over recursively nested entity trees.
//!
//! # Invariants
//! - Traversal uses an explicit stack; tree depth never grows the call stack.
//! - A result is only returned after a confirmed match. Exhausting the stack
//!   is always `NotFound`.
//! - Visitation order is LIFO and otherwise unspecified.

use super::{Collection, Entity};
use crate::error::{PandoraError, PandoraResult};

/// Entities that own a collection of their own kind (e.g. sources in
/// sources).
pub trait Nested: Entity {
    fn children(&self) -> Collection<Self>;
}

/// Whether `id` exists anywhere below `root`.
pub(crate) fn exists_in_tree<E: Nested>(root: &Collection<E>, id: &str) -> PandoraResult<bool> {
    Ok(containing_collection(root, id)?.is_some())
}

/// Finds the entity `id` anywhere below `root`.
///
/// # Errors
/// - `NotFound` when `root` is empty or no node of the tree matches.
pub(crate) fn find_in_tree<E: Nested>(root: &Collection<E>, id: &str) -> PandoraResult<E> {
    if root.count()? == 0 {
        return Err(PandoraError::not_found(E::KIND, id));
    }
    match containing_collection(root, id)? {
        Some(collection) => collection.get(id),
        None => Err(PandoraError::not_found(E::KIND, id)),
    }
}

fn containing_collection<E: Nested>(
    root: &Collection<E>,
    id: &str,
) -> PandoraResult<Option<Collection<E>>> {
    if root.has(id)? {
        return Ok(Some(root.clone()));
    }

    let mut stack = root.list()?;
    while let Some(entity) = stack.pop() {
        let children = entity.children();
        if children.has(id)? {
            return Ok(Some(children));
        }
        stack.extend(children.list()?);
    }
    Ok(None)
}
