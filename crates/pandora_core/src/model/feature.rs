//! Features: a data array attached to a tag with link semantics.

use super::block::BlockScope;
use super::data_array::DataArray;
use crate::entity::{check_entity_input, Entity, EntityNode};
use crate::error::{PandoraError, PandoraResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub(crate) const ATTR_LINK_TYPE: &str = "link_type";
pub(crate) const ATTR_DATA: &str = "data";

/// How a feature's data relates to the tag's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Data is sliced with the tag's position and extent.
    Tagged,
    /// Data applies to the tag as a whole.
    Untagged,
    /// Data is indexed by the tag's position index.
    Indexed,
}

impl LinkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tagged => "tagged",
            Self::Untagged => "untagged",
            Self::Indexed => "indexed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tagged" => Some(Self::Tagged),
            "untagged" => Some(Self::Untagged),
            "indexed" => Some(Self::Indexed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    node: EntityNode,
    scope: BlockScope,
}

impl Entity for Feature {
    const KIND: &'static str = "feature";
    const ID_PREFIX: &'static str = "feature";
    type Context = BlockScope;

    fn open(ctx: &BlockScope, node: EntityNode) -> PandoraResult<Self> {
        Ok(Self {
            node,
            scope: ctx.clone(),
        })
    }

    fn node(&self) -> &EntityNode {
        &self.node
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let link_type = self.link_type().map_or("?", LinkType::as_str);
        let data = self.data_id().unwrap_or_else(|_| "?".to_string());
        write!(
            f,
            "Feature: {{link_type = {link_type}, data = {data}, id = {}}}",
            self.id()
        )
    }
}

impl Feature {
    pub fn link_type(&self) -> PandoraResult<LinkType> {
        let raw = self.node.required_text(ATTR_LINK_TYPE)?;
        LinkType::parse(&raw).ok_or_else(|| {
            PandoraError::InvalidData(format!(
                "invalid link type `{raw}` on feature `{}`",
                self.id()
            ))
        })
    }

    pub fn set_link_type(&self, link_type: LinkType) -> PandoraResult<()> {
        self.node.group().set_attr(ATTR_LINK_TYPE, link_type.as_str())?;
        self.node.touch()
    }

    /// Id of the referenced data array.
    pub fn data_id(&self) -> PandoraResult<String> {
        self.node.required_text(ATTR_DATA)
    }

    /// Resolves the referenced data array.
    ///
    /// # Errors
    /// - `NotFound` when the data array was removed from the block.
    pub fn data(&self) -> PandoraResult<DataArray> {
        self.scope.data_arrays().get(&self.data_id()?)
    }

    pub fn set_data(&self, data: &DataArray) -> PandoraResult<()> {
        let id = checked_data_id(&self.scope, data)?;
        self.node.group().set_attr(ATTR_DATA, id)?;
        self.node.touch()
    }
}

/// Validates that `data` is a data array of `scope`'s block.
pub(crate) fn checked_data_id(scope: &BlockScope, data: &DataArray) -> PandoraResult<String> {
    check_entity_input(data)?;
    if !scope.data_arrays().has(data.id())? {
        return Err(PandoraError::not_found(DataArray::KIND, data.id()));
    }
    Ok(data.id().to_string())
}
