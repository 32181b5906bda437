//! Entity identity and the engines that navigate entity graphs.
//!
//! # Responsibility
//! - Bind typed entities to storage nodes (`EntityNode`, `Entity`).
//! - Provide the generic per-collection accessor (`Collection`).
//! - Resolve id references (`ReferenceList`), search nested trees
//!   (`traversal`) and iterate parent-linked sections (`SectionIter`).
//!
//! # Invariants
//! - An entity's id is the name of its node inside the collection group and
//!   never changes after creation.
//! - Setters and removals write immediately and refresh `updated_at`;
//!   a removal that finds nothing leaves it untouched.

mod collection;
mod references;
mod section_iter;
pub(crate) mod traversal;

pub use collection::Collection;
pub use references::ReferenceList;
pub use section_iter::SectionIter;
pub use traversal::Nested;

use crate::error::{PandoraError, PandoraResult};
use crate::model::section::{metadata_group, Section};
use crate::store::Group;
use crate::util::{check_name_or_id, now_epoch_ms};
use std::fmt::{self, Debug, Formatter};

pub(crate) const ATTR_NAME: &str = "name";
pub(crate) const ATTR_TYPE: &str = "type";
pub(crate) const ATTR_DEFINITION: &str = "definition";
pub(crate) const ATTR_METADATA: &str = "metadata";
pub(crate) const ATTR_CREATED_AT: &str = "created_at";
pub(crate) const ATTR_UPDATED_AT: &str = "updated_at";

/// Storage node plus id shared by every entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    group: Group,
    id: String,
}

impl EntityNode {
    pub(crate) fn new(group: Group, id: String) -> Self {
        Self { group, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub(crate) fn stamp_created(&self) -> PandoraResult<()> {
        let now = now_epoch_ms();
        self.group.set_attr(ATTR_CREATED_AT, now)?;
        self.group.set_attr(ATTR_UPDATED_AT, now)
    }

    pub(crate) fn touch(&self) -> PandoraResult<()> {
        self.group.set_attr(ATTR_UPDATED_AT, now_epoch_ms())
    }

    /// Refreshes `updated_at` when a removal actually changed something.
    pub(crate) fn touch_if(&self, changed: bool) -> PandoraResult<bool> {
        if changed {
            self.touch()?;
        }
        Ok(changed)
    }

    /// Reads a text attribute that every entity of this kind must carry.
    pub(crate) fn required_text(&self, name: &str) -> PandoraResult<String> {
        self.group.text_attr(name)?.ok_or_else(|| {
            PandoraError::InvalidData(format!(
                "entity `{}` is missing required attribute `{name}`",
                self.id
            ))
        })
    }
}

/// A typed view over one storage node.
pub trait Entity: Clone + Debug + Sized {
    /// Human-readable kind used in errors and logs.
    const KIND: &'static str;
    /// Prefix of generated ids.
    const ID_PREFIX: &'static str;
    /// Handles an entity needs besides its own node (e.g. its block).
    type Context: Clone + Debug;

    /// Binds an entity to an existing node.
    fn open(ctx: &Self::Context, node: EntityNode) -> PandoraResult<Self>;

    fn node(&self) -> &EntityNode;

    fn id(&self) -> &str {
        self.node().id()
    }

    /// Creation time in epoch milliseconds.
    fn created_at(&self) -> PandoraResult<Option<i64>> {
        self.node().group().int_attr(ATTR_CREATED_AT)
    }

    /// Last modification time in epoch milliseconds.
    fn updated_at(&self) -> PandoraResult<Option<i64>> {
        self.node().group().int_attr(ATTR_UPDATED_AT)
    }
}

/// Entities carrying a name, a type and an optional definition.
pub trait NamedEntity: Entity {
    fn name(&self) -> PandoraResult<String> {
        self.node().required_text(ATTR_NAME)
    }

    fn set_name(&self, name: &str) -> PandoraResult<()> {
        check_name_or_id(name, "name")?;
        self.node().group().set_attr(ATTR_NAME, name)?;
        self.node().touch()
    }

    fn entity_type(&self) -> PandoraResult<String> {
        self.node().required_text(ATTR_TYPE)
    }

    fn set_type(&self, entity_type: &str) -> PandoraResult<()> {
        self.node().group().set_attr(ATTR_TYPE, entity_type)?;
        self.node().touch()
    }

    fn definition(&self) -> PandoraResult<Option<String>> {
        self.node().group().text_attr(ATTR_DEFINITION)
    }

    fn set_definition(&self, definition: &str) -> PandoraResult<()> {
        self.node().group().set_attr(ATTR_DEFINITION, definition)?;
        self.node().touch()
    }

    fn remove_definition(&self) -> PandoraResult<bool> {
        let removed = self.node().group().remove_attr(ATTR_DEFINITION)?;
        self.node().touch_if(removed)
    }
}

/// Named entities that may point at a metadata `Section`.
pub trait EntityWithMetadata: NamedEntity {
    /// Resolves the linked section, `None` when no link is set.
    ///
    /// # Errors
    /// - `NotFound` when the linked section was removed from the file.
    fn metadata(&self) -> PandoraResult<Option<Section>> {
        let Some(section_id) = self.node().group().text_attr(ATTR_METADATA)? else {
            return Ok(None);
        };
        let sections = metadata_group(self.node().group().storage())?;
        Collection::<Section>::new(sections.clone(), sections)
            .get(&section_id)
            .map(Some)
    }

    /// Links `section` as this entity's metadata.
    ///
    /// # Errors
    /// - `InvalidInput` for a section with an empty id.
    /// - `NotFound` when the section does not belong to this file.
    fn set_metadata(&self, section: &Section) -> PandoraResult<()> {
        check_name_or_id(section.id(), "section id")?;
        let sections = metadata_group(self.node().group().storage())?;
        let in_file = section.node().group().storage().same_file(sections.storage())
            && sections.has_group(section.id())?;
        if !in_file {
            return Err(PandoraError::not_found(Section::KIND, section.id()));
        }
        self.node().group().set_attr(ATTR_METADATA, section.id())?;
        self.node().touch()
    }

    fn remove_metadata(&self) -> PandoraResult<bool> {
        let removed = self.node().group().remove_attr(ATTR_METADATA)?;
        self.node().touch_if(removed)
    }
}

/// Writes `Label: {name = …, type = …, id = …}`; unreadable attributes show
/// as `?`.
pub(crate) fn fmt_named<E: NamedEntity>(
    entity: &E,
    label: &str,
    f: &mut Formatter<'_>,
) -> fmt::Result {
    let name = entity.name().unwrap_or_else(|_| "?".to_string());
    let entity_type = entity.entity_type().unwrap_or_else(|_| "?".to_string());
    write!(
        f,
        "{label}: {{name = {name}, type = {entity_type}, id = {}}}",
        entity.id()
    )
}

/// Rejects entity handles that do not carry a usable id.
pub(crate) fn check_entity_input<E: Entity>(entity: &E) -> PandoraResult<()> {
    if entity.id().trim().is_empty() {
        return Err(PandoraError::InvalidInput(format!(
            "{} handle has an empty id",
            E::KIND
        )));
    }
    Ok(())
}
