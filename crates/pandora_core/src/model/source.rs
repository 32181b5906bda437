//! Sources: recursively nestable entities rooted at a block.

use crate::entity::traversal::{exists_in_tree, find_in_tree};
use crate::entity::{
    fmt_named, Collection, Entity, EntityNode, EntityWithMetadata, NamedEntity, Nested,
};
use crate::error::PandoraResult;
use crate::store::Group;
use std::fmt::{Display, Formatter};

pub(crate) const SOURCES_GROUP: &str = "sources";

#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    node: EntityNode,
    sources: Group,
}

impl Entity for Source {
    const KIND: &'static str = "source";
    const ID_PREFIX: &'static str = "source";
    type Context = ();

    fn open(_ctx: &(), node: EntityNode) -> PandoraResult<Self> {
        let sources = node.group().open_group(SOURCES_GROUP, true)?;
        Ok(Self { node, sources })
    }

    fn node(&self) -> &EntityNode {
        &self.node
    }
}

impl NamedEntity for Source {}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, "Source", f)
    }
}

impl EntityWithMetadata for Source {}

impl Nested for Source {
    fn children(&self) -> Collection<Source> {
        self.sources()
    }
}

impl Source {
    /// Direct child sources.
    pub fn sources(&self) -> Collection<Source> {
        Collection::new(self.sources.clone(), ())
    }

    /// Whether `id` exists anywhere in this source's subtree.
    pub fn exists_source(&self, id: &str) -> PandoraResult<bool> {
        exists_in_tree(&self.sources(), id)
    }

    /// Finds `id` anywhere in this source's subtree.
    pub fn find_source(&self, id: &str) -> PandoraResult<Source> {
        find_in_tree(&self.sources(), id)
    }
}
