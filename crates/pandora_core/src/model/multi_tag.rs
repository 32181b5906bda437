//! Multi tags: tags whose positions and extents are data arrays.

use super::block::BlockScope;
use super::data_array::DataArray;
use super::feature::checked_data_id;
use super::source_refs::EntityWithSources;
use super::tag::{BaseTag, TagParts};
use crate::entity::{
    fmt_named, Entity, EntityNode, EntityWithMetadata, NamedEntity, ReferenceList,
};
use crate::error::PandoraResult;
use std::fmt::{Display, Formatter};

const ATTR_POSITIONS: &str = "positions";
const ATTR_EXTENTS: &str = "extents";

#[derive(Debug, Clone, PartialEq)]
pub struct MultiTag {
    node: EntityNode,
    scope: BlockScope,
    parts: TagParts,
}

impl Entity for MultiTag {
    const KIND: &'static str = "multi tag";
    const ID_PREFIX: &'static str = "multi_tag";
    type Context = BlockScope;

    fn open(ctx: &BlockScope, node: EntityNode) -> PandoraResult<Self> {
        let parts = TagParts::open(&node)?;
        Ok(Self {
            node,
            scope: ctx.clone(),
            parts,
        })
    }

    fn node(&self) -> &EntityNode {
        &self.node
    }
}

impl NamedEntity for MultiTag {}

impl Display for MultiTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, "MultiTag", f)
    }
}

impl EntityWithMetadata for MultiTag {}

impl EntityWithSources for MultiTag {
    fn source_refs(&self) -> &ReferenceList {
        self.parts.source_refs()
    }

    fn block_scope(&self) -> &BlockScope {
        &self.scope
    }
}

impl BaseTag for MultiTag {
    fn tag_parts(&self) -> &TagParts {
        &self.parts
    }
}

impl MultiTag {
    /// Data array holding one position per row; `None` until set.
    pub fn positions(&self) -> PandoraResult<Option<DataArray>> {
        self.resolve_array(ATTR_POSITIONS)
    }

    pub fn set_positions(&self, positions: &DataArray) -> PandoraResult<()> {
        let id = checked_data_id(&self.scope, positions)?;
        self.node.group().set_attr(ATTR_POSITIONS, id)?;
        self.node.touch()
    }

    pub fn extents(&self) -> PandoraResult<Option<DataArray>> {
        self.resolve_array(ATTR_EXTENTS)
    }

    pub fn set_extents(&self, extents: &DataArray) -> PandoraResult<()> {
        let id = checked_data_id(&self.scope, extents)?;
        self.node.group().set_attr(ATTR_EXTENTS, id)?;
        self.node.touch()
    }

    pub fn remove_extents(&self) -> PandoraResult<bool> {
        let removed = self.node.group().remove_attr(ATTR_EXTENTS)?;
        self.node.touch_if(removed)
    }

    fn resolve_array(&self, attr: &str) -> PandoraResult<Option<DataArray>> {
        match self.node.group().text_attr(attr)? {
            Some(id) => self.scope.data_arrays().get(&id).map(Some),
            None => Ok(None),
        }
    }
}
