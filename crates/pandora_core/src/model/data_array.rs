//! Data arrays. Only the descriptive attributes live here; sample storage
//! is handled by the array codec layer.

use super::block::BlockScope;
use super::source_refs::EntityWithSources;
use crate::entity::{
    fmt_named, Entity, EntityNode, EntityWithMetadata, NamedEntity, ReferenceList,
};
use crate::error::PandoraResult;
use crate::util::units::validate_unit;
use std::fmt::{Display, Formatter};

const ATTR_LABEL: &str = "label";
const ATTR_UNIT: &str = "unit";

#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    node: EntityNode,
    scope: BlockScope,
    source_refs: ReferenceList,
}

impl Entity for DataArray {
    const KIND: &'static str = "data array";
    const ID_PREFIX: &'static str = "data_array";
    type Context = BlockScope;

    fn open(ctx: &BlockScope, node: EntityNode) -> PandoraResult<Self> {
        let source_refs = ReferenceList::open(node.group(), "sources", "source")?;
        Ok(Self {
            node,
            scope: ctx.clone(),
            source_refs,
        })
    }

    fn node(&self) -> &EntityNode {
        &self.node
    }
}

impl NamedEntity for DataArray {}

impl Display for DataArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, "DataArray", f)
    }
}

impl EntityWithMetadata for DataArray {}

impl EntityWithSources for DataArray {
    fn source_refs(&self) -> &ReferenceList {
        &self.source_refs
    }

    fn block_scope(&self) -> &BlockScope {
        &self.scope
    }
}

impl DataArray {
    pub fn label(&self) -> PandoraResult<Option<String>> {
        self.node.group().text_attr(ATTR_LABEL)
    }

    pub fn set_label(&self, label: &str) -> PandoraResult<()> {
        self.node.group().set_attr(ATTR_LABEL, label)?;
        self.node.touch()
    }

    pub fn unit(&self) -> PandoraResult<Option<String>> {
        self.node.group().text_attr(ATTR_UNIT)
    }

    /// Stores the sanitized form of `unit`.
    ///
    /// # Errors
    /// - `InvalidUnit` when `unit` is not an atomic SI unit.
    pub fn set_unit(&self, unit: &str) -> PandoraResult<()> {
        let sanitized = validate_unit(unit, "DataArray::set_unit")?;
        self.node.group().set_attr(ATTR_UNIT, sanitized)?;
        self.node.touch()
    }

    pub fn remove_unit(&self) -> PandoraResult<bool> {
        let removed = self.node.group().remove_attr(ATTR_UNIT)?;
        self.node.touch_if(removed)
    }
}
