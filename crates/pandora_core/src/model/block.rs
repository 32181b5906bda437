//! Blocks: top-level containers of sources, data arrays and tags.
//!
//! # Invariants
//! - Every block owns exactly four collection groups: `sources`,
//!   `data_arrays`, `simple_tags` (tags) and `data_tags` (multi tags).
//! - Entities inside a block only reference data arrays and sources of the
//!   same block.

use super::data_array::DataArray;
use super::multi_tag::MultiTag;
use super::source::{Source, SOURCES_GROUP};
use super::tag::Tag;
use crate::entity::traversal::{exists_in_tree, find_in_tree};
use crate::entity::{fmt_named, Collection, Entity, EntityNode, EntityWithMetadata, NamedEntity};
use crate::error::PandoraResult;
use crate::store::Group;
use std::fmt::{Display, Formatter};

const DATA_ARRAYS_GROUP: &str = "data_arrays";
const TAGS_GROUP: &str = "simple_tags";
const MULTI_TAGS_GROUP: &str = "data_tags";

/// Handles that block-owned entities use to resolve their references.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockScope {
    block_id: String,
    sources: Group,
    data_arrays: Group,
}

impl BlockScope {
    /// Id of the owning block.
    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn data_arrays(&self) -> Collection<DataArray> {
        Collection::new(self.data_arrays.clone(), self.clone())
    }

    pub fn sources(&self) -> Collection<Source> {
        Collection::new(self.sources.clone(), ())
    }

    /// Whether `id` is a source anywhere in the block's source tree.
    pub fn exists_source(&self, id: &str) -> PandoraResult<bool> {
        exists_in_tree(&self.sources(), id)
    }

    pub fn find_source(&self, id: &str) -> PandoraResult<Source> {
        find_in_tree(&self.sources(), id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    node: EntityNode,
    scope: BlockScope,
    tags: Group,
    multi_tags: Group,
}

impl Entity for Block {
    const KIND: &'static str = "block";
    const ID_PREFIX: &'static str = "block";
    type Context = ();

    fn open(_ctx: &(), node: EntityNode) -> PandoraResult<Self> {
        let group = node.group();
        let scope = BlockScope {
            block_id: node.id().to_string(),
            sources: group.open_group(SOURCES_GROUP, true)?,
            data_arrays: group.open_group(DATA_ARRAYS_GROUP, true)?,
        };
        let tags = group.open_group(TAGS_GROUP, true)?;
        let multi_tags = group.open_group(MULTI_TAGS_GROUP, true)?;
        Ok(Self {
            node,
            scope,
            tags,
            multi_tags,
        })
    }

    fn node(&self) -> &EntityNode {
        &self.node
    }
}

impl NamedEntity for Block {}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, "Block", f)
    }
}

impl EntityWithMetadata for Block {}

impl Block {
    /// Sources directly owned by this block.
    pub fn sources(&self) -> Collection<Source> {
        self.scope.sources()
    }

    pub fn data_arrays(&self) -> Collection<DataArray> {
        self.scope.data_arrays()
    }

    pub fn tags(&self) -> Collection<Tag> {
        Collection::new(self.tags.clone(), self.scope.clone())
    }

    pub fn multi_tags(&self) -> Collection<MultiTag> {
        Collection::new(self.multi_tags.clone(), self.scope.clone())
    }

    /// Whether `id` is a source at any depth below this block.
    pub fn exists_source(&self, id: &str) -> PandoraResult<bool> {
        self.scope.exists_source(id)
    }

    /// Finds a source at any depth below this block.
    ///
    /// # Errors
    /// - `NotFound` when the block has no sources or none matches.
    pub fn find_source(&self, id: &str) -> PandoraResult<Source> {
        self.scope.find_source(id)
    }

    pub fn scope(&self) -> &BlockScope {
        &self.scope
    }
}
