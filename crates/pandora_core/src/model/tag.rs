//! Tags and the reference/feature behaviour shared with multi tags.
//!
//! # Invariants
//! - `units` are stored sanitized; a list with one invalid unit is rejected
//!   whole and leaves the stored units untouched.
//! - References and features only point at data arrays of the tag's block.

use super::block::BlockScope;
use super::data_array::DataArray;
use super::feature::{checked_data_id, Feature, LinkType, ATTR_DATA, ATTR_LINK_TYPE};
use super::source_refs::EntityWithSources;
use crate::entity::{
    check_entity_input, fmt_named, Collection, Entity, EntityNode, EntityWithMetadata,
    NamedEntity, ReferenceList,
};
use crate::error::PandoraResult;
use crate::store::Group;
use crate::util::units::validate_units;
use std::fmt::{Display, Formatter};

const ATTR_UNITS: &str = "units";
const ATTR_POSITION: &str = "position";
const ATTR_EXTENT: &str = "extent";

/// Storage handles every tag kind carries besides its node.
#[derive(Debug, Clone, PartialEq)]
pub struct TagParts {
    references: ReferenceList,
    source_refs: ReferenceList,
    features: Group,
}

impl TagParts {
    pub(crate) fn open(node: &EntityNode) -> PandoraResult<Self> {
        Ok(Self {
            references: ReferenceList::open(node.group(), "references", DataArray::KIND)?,
            source_refs: ReferenceList::open(node.group(), "sources", "source")?,
            features: node.group().open_group("features", true)?,
        })
    }

    pub(crate) fn source_refs(&self) -> &ReferenceList {
        &self.source_refs
    }
}

/// Units, data array references and features common to all tag kinds.
pub trait BaseTag: EntityWithSources {
    #[doc(hidden)]
    fn tag_parts(&self) -> &TagParts;

    fn units(&self) -> PandoraResult<Vec<String>> {
        Ok(self
            .node()
            .group()
            .text_list_attr(ATTR_UNITS)?
            .unwrap_or_default())
    }

    /// Replaces the units with their sanitized forms.
    ///
    /// # Errors
    /// - `InvalidUnit` naming the first unit that is not an atomic SI unit;
    ///   nothing is written in that case.
    fn set_units<S: AsRef<str>>(&self, units: &[S]) -> PandoraResult<()> {
        let sanitized = validate_units(units, "BaseTag::set_units")?;
        self.node().group().set_attr(ATTR_UNITS, sanitized)?;
        self.node().touch()
    }

    fn remove_units(&self) -> PandoraResult<bool> {
        let removed = self.node().group().remove_attr(ATTR_UNITS)?;
        self.node().touch_if(removed)
    }

    fn has_reference(&self, data: &DataArray) -> PandoraResult<bool> {
        check_entity_input(data)?;
        self.tag_parts().references.has(data.id())
    }

    fn reference_count(&self) -> PandoraResult<usize> {
        self.tag_parts().references.count()
    }

    /// Resolves the referenced data array at `index`.
    ///
    /// # Errors
    /// - `OutOfBounds` when `index >= reference_count()`.
    /// - `NotFound` when the data array was removed after being referenced.
    fn get_reference(&self, index: usize) -> PandoraResult<DataArray> {
        let data_arrays = self.block_scope().data_arrays();
        self.tag_parts()
            .references
            .get_at(index, |id| data_arrays.get(id))
    }

    fn get_reference_by_id(&self, id: &str) -> PandoraResult<DataArray> {
        let data_arrays = self.block_scope().data_arrays();
        self.tag_parts().references.get(id, |id| data_arrays.get(id))
    }

    fn references(&self) -> PandoraResult<Vec<DataArray>> {
        let data_arrays = self.block_scope().data_arrays();
        self.tag_parts()
            .references
            .ids()?
            .iter()
            .map(|id| data_arrays.get(id))
            .collect()
    }

    /// Referenced data arrays accepted by `filter`, in storage order.
    fn references_filtered(
        &self,
        filter: impl FnMut(&DataArray) -> bool,
    ) -> PandoraResult<Vec<DataArray>> {
        let mut references = self.references()?;
        references.retain(filter);
        Ok(references)
    }

    fn add_reference(&self, data: &DataArray) -> PandoraResult<()> {
        check_entity_input(data)?;
        self.add_reference_id(data.id())
    }

    /// References the data array `id` of this tag's block.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank id.
    /// - `NotFound` when the block has no such data array.
    fn add_reference_id(&self, id: &str) -> PandoraResult<()> {
        let data_arrays = self.block_scope().data_arrays();
        self.tag_parts()
            .references
            .add(id, |id| data_arrays.has(id))?;
        self.node().touch()
    }

    fn remove_reference(&self, data: &DataArray) -> PandoraResult<bool> {
        check_entity_input(data)?;
        self.remove_reference_id(data.id())
    }

    fn remove_reference_id(&self, id: &str) -> PandoraResult<bool> {
        let removed = self.tag_parts().references.remove(id)?;
        self.node().touch_if(removed)
    }

    /// Collection accessor over this tag's features.
    fn feature_collection(&self) -> Collection<Feature> {
        Collection::new(
            self.tag_parts().features.clone(),
            self.block_scope().clone(),
        )
    }

    fn has_feature(&self, id: &str) -> PandoraResult<bool> {
        self.feature_collection().has(id)
    }

    fn feature_count(&self) -> PandoraResult<usize> {
        self.feature_collection().count()
    }

    fn get_feature(&self, id: &str) -> PandoraResult<Feature> {
        self.feature_collection().get(id)
    }

    fn feature_at(&self, index: usize) -> PandoraResult<Feature> {
        self.feature_collection().get_at(index)
    }

    fn features(&self) -> PandoraResult<Vec<Feature>> {
        self.feature_collection().list()
    }

    /// Features accepted by `filter`, in storage order.
    fn features_filtered(
        &self,
        filter: impl FnMut(&Feature) -> bool,
    ) -> PandoraResult<Vec<Feature>> {
        self.feature_collection().list_filtered(filter)
    }

    /// Attaches `data` as a new feature with `link_type`.
    ///
    /// # Errors
    /// - `NotFound` when `data` is not a data array of this tag's block.
    fn create_feature(&self, data: &DataArray, link_type: LinkType) -> PandoraResult<Feature> {
        let data_id = checked_data_id(self.block_scope(), data)?;
        self.feature_collection().create_with(|node| {
            node.group().set_attr(ATTR_LINK_TYPE, link_type.as_str())?;
            node.group().set_attr(ATTR_DATA, data_id.as_str())
        })
    }

    /// Removes the feature `id`; `false` when there is none.
    fn delete_feature(&self, id: &str) -> PandoraResult<bool> {
        let removed = self.feature_collection().remove(id)?;
        self.node().touch_if(removed)
    }
}

/// A tag marking one position (and optional extent) in referenced data.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    node: EntityNode,
    scope: BlockScope,
    parts: TagParts,
}

impl Entity for Tag {
    const KIND: &'static str = "tag";
    const ID_PREFIX: &'static str = "tag";
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

impl NamedEntity for Tag {}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, "Tag", f)
    }
}

impl EntityWithMetadata for Tag {}

impl EntityWithSources for Tag {
    fn source_refs(&self) -> &ReferenceList {
        self.parts.source_refs()
    }

    fn block_scope(&self) -> &BlockScope {
        &self.scope
    }
}

impl BaseTag for Tag {
    fn tag_parts(&self) -> &TagParts {
        &self.parts
    }
}

impl Tag {
    pub fn position(&self) -> PandoraResult<Vec<f64>> {
        Ok(self
            .node
            .group()
            .float_list_attr(ATTR_POSITION)?
            .unwrap_or_default())
    }

    pub fn set_position(&self, position: &[f64]) -> PandoraResult<()> {
        self.node.group().set_attr(ATTR_POSITION, position)?;
        self.node.touch()
    }

    pub fn extent(&self) -> PandoraResult<Vec<f64>> {
        Ok(self
            .node
            .group()
            .float_list_attr(ATTR_EXTENT)?
            .unwrap_or_default())
    }

    pub fn set_extent(&self, extent: &[f64]) -> PandoraResult<()> {
        self.node.group().set_attr(ATTR_EXTENT, extent)?;
        self.node.touch()
    }

    pub fn remove_extent(&self) -> PandoraResult<bool> {
        let removed = self.node.group().remove_attr(ATTR_EXTENT)?;
        self.node.touch_if(removed)
    }
}
