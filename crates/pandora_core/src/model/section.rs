//! Metadata sections.
//!
//! # Responsibility
//! - Represent one node of the metadata forest.
//! - Create child sections and enumerate direct children lazily.
//!
//! # Invariants
//! - All sections of a file live flat in the root `metadata` group.
//! - A section without a `parent` attribute (or with an empty one) is a
//!   root; otherwise `parent` holds the id of another section.

use crate::entity::{fmt_named, Collection, Entity, EntityNode, NamedEntity, SectionIter};
use crate::error::PandoraResult;
use crate::store::{Group, Storage};
use std::fmt::{Display, Formatter};

pub(crate) const METADATA_GROUP: &str = "metadata";
pub(crate) const ATTR_PARENT: &str = "parent";
const ATTR_REPOSITORY: &str = "repository";

/// Opens the file-level group holding every section.
pub(crate) fn metadata_group(storage: &Storage) -> PandoraResult<Group> {
    storage.root().open_group(METADATA_GROUP, false)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    node: EntityNode,
    metadata: Group,
}

impl Entity for Section {
    const KIND: &'static str = "section";
    const ID_PREFIX: &'static str = "section";
    type Context = Group;

    fn open(ctx: &Group, node: EntityNode) -> PandoraResult<Self> {
        Ok(Self {
            node,
            metadata: ctx.clone(),
        })
    }

    fn node(&self) -> &EntityNode {
        &self.node
    }
}

impl NamedEntity for Section {}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, "Section", f)
    }
}

impl Section {
    /// Id of the parent section; `None` for roots.
    pub fn parent_id(&self) -> PandoraResult<Option<String>> {
        Ok(self
            .node
            .group()
            .text_attr(ATTR_PARENT)?
            .filter(|parent| !parent.is_empty()))
    }

    /// Resolves the parent section; `None` for roots.
    ///
    /// # Errors
    /// - `NotFound` when the parent id no longer resolves.
    pub fn parent(&self) -> PandoraResult<Option<Section>> {
        match self.parent_id()? {
            Some(parent_id) => self.all_sections().get(&parent_id).map(Some),
            None => Ok(None),
        }
    }

    /// Creates a direct child section.
    pub fn create_section(&self, name: &str, section_type: &str) -> PandoraResult<Section> {
        self.all_sections()
            .create_named_with(name, section_type, |node| {
                node.group().set_attr(ATTR_PARENT, self.id())
            })
    }

    /// Lazy iterator over the direct children.
    pub fn sections(&self) -> PandoraResult<SectionIter> {
        SectionIter::new(self.metadata.clone(), self.id())
    }

    /// Direct children, collected eagerly.
    pub fn children(&self) -> PandoraResult<Vec<Section>> {
        self.sections()?.collect()
    }

    pub fn section_count(&self) -> PandoraResult<usize> {
        let mut count = 0;
        for section in self.sections()? {
            section?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether `id` is a direct child of this section.
    pub fn has_section(&self, id: &str) -> PandoraResult<bool> {
        let sections = self.all_sections();
        if !sections.has(id)? {
            return Ok(false);
        }
        Ok(sections.get(id)?.parent_id()?.as_deref() == Some(self.id()))
    }

    pub fn repository(&self) -> PandoraResult<Option<String>> {
        self.node.group().text_attr(ATTR_REPOSITORY)
    }

    pub fn set_repository(&self, repository: &str) -> PandoraResult<()> {
        self.node.group().set_attr(ATTR_REPOSITORY, repository)?;
        self.node.touch()
    }

    fn all_sections(&self) -> Collection<Section> {
        Collection::new(self.metadata.clone(), self.metadata.clone())
    }
}
