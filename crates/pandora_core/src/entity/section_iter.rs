//! Lazy iteration over sections linked to one parent.
//!
//! All sections of a file live flat in one group; the tree is encoded by the
//! optional `parent` attribute of each section. The iterator walks that group
//! by position and stops on children whose parent attribute matches.
//!
//! # Invariants
//! - The child names (and so `size`) are sampled once when the iterator is
//!   built or rebuilt via `begin()`; `end()` is the position equal to that
//!   size. A full traversal reads the name list once.
//! - Parent attributes are read live on every scan step; children removed
//!   since the snapshot are skipped.
//! - Dereferencing at or past the end fails with `OutOfBounds`.

use super::{Entity, EntityNode};
use crate::error::{PandoraError, PandoraResult};
use crate::model::section::{Section, ATTR_PARENT};
use crate::store::Group;
use std::rc::Rc;

/// Cursor over the sections whose parent is `parent` (empty = roots).
///
/// Usable as a cursor (`get`/`advance`/`begin`/`end`) and as a Rust
/// [`Iterator`] yielding `PandoraResult<Section>`.
#[derive(Debug, Clone)]
pub struct SectionIter {
    group: Group,
    parent: String,
    names: Rc<[String]>,
    index: usize,
    size: usize,
}

impl SectionIter {
    /// Binds to `group` with a parent filter and seeks the first match.
    pub(crate) fn new(group: Group, parent: impl Into<String>) -> PandoraResult<Self> {
        let names: Rc<[String]> = group.object_names()?.into();
        let mut iter = Self {
            group,
            parent: parent.into(),
            size: names.len(),
            names,
            index: 0,
        };
        iter.index = iter.next_index(0)?;
        Ok(iter)
    }

    /// Parent id this iterator filters on; empty for root sections.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_end(&self) -> bool {
        self.index >= self.size
    }

    /// Moves to the next match strictly after the current position.
    pub fn advance(&mut self) -> PandoraResult<()> {
        if !self.is_end() {
            self.index = self.next_index(self.index + 1)?;
        }
        Ok(())
    }

    /// Section at the current position.
    ///
    /// # Errors
    /// - `OutOfBounds` when the iterator is at its end.
    pub fn get(&self) -> PandoraResult<Section> {
        if self.is_end() {
            return Err(PandoraError::OutOfBounds {
                kind: Section::KIND,
                index: self.index,
                count: self.size,
            });
        }
        let id = &self.names[self.index];
        let node = self.group.open_group(id, false)?;
        Section::open(&self.group, EntityNode::new(node, id.clone()))
    }

    /// Fresh iterator over the same group and filter, at its first match.
    pub fn begin(&self) -> PandoraResult<Self> {
        Self::new(self.group.clone(), self.parent.clone())
    }

    /// Iterator positioned at the end sentinel.
    pub fn end(&self) -> Self {
        Self {
            index: self.size,
            ..self.clone()
        }
    }

    fn next_index(&self, start: usize) -> PandoraResult<usize> {
        for (index, name) in self.names.iter().enumerate().skip(start) {
            if !self.group.has_group(name)? {
                continue;
            }
            let child_parent = self.group.open_group(name, false)?.text_attr(ATTR_PARENT)?;
            if parent_matches(&self.parent, child_parent.as_deref()) {
                return Ok(index);
            }
        }
        Ok(self.size)
    }
}

impl PartialEq for SectionIter {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.index == other.index
    }
}

impl Iterator for SectionIter {
    type Item = PandoraResult<Section>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_end() {
            return None;
        }
        let item = self.get();
        match self.advance() {
            Ok(()) => Some(item),
            Err(err) => {
                self.index = self.size;
                Some(item.and(Err(err)))
            }
        }
    }
}

/// Parent-linkage predicate.
///
/// A root query (`target` empty) matches children without a parent or with
/// an empty parent; any other query matches an identical non-empty parent.
pub(crate) fn parent_matches(target: &str, child_parent: Option<&str>) -> bool {
    match child_parent {
        None => target.is_empty(),
        Some("") => target.is_empty(),
        Some(parent) => !target.is_empty() && parent == target,
    }
}
