//! Source references held by data arrays and tags.

use super::block::BlockScope;
use super::source::Source;
use crate::entity::{check_entity_input, Entity, EntityWithMetadata, ReferenceList};
use crate::error::PandoraResult;

/// Entities that reference sources of their block.
///
/// Referenced sources may sit at any depth of the block's source tree, so
/// both validation and resolution go through the tree search.
pub trait EntityWithSources: EntityWithMetadata {
    #[doc(hidden)]
    fn source_refs(&self) -> &ReferenceList;

    #[doc(hidden)]
    fn block_scope(&self) -> &BlockScope;

    fn has_source(&self, source: &Source) -> PandoraResult<bool> {
        check_entity_input(source)?;
        self.source_refs().has(source.id())
    }

    fn source_count(&self) -> PandoraResult<usize> {
        self.source_refs().count()
    }

    /// Resolves the referenced source at `index`.
    fn get_source(&self, index: usize) -> PandoraResult<Source> {
        self.source_refs()
            .get_at(index, |id| self.block_scope().find_source(id))
    }

    fn sources(&self) -> PandoraResult<Vec<Source>> {
        self.source_refs()
            .ids()?
            .iter()
            .map(|id| self.block_scope().find_source(id))
            .collect()
    }

    /// References `source`, which must live in the same block.
    fn add_source(&self, source: &Source) -> PandoraResult<()> {
        check_entity_input(source)?;
        self.add_source_id(source.id())
    }

    fn add_source_id(&self, id: &str) -> PandoraResult<()> {
        self.source_refs()
            .add(id, |id| self.block_scope().exists_source(id))?;
        self.node().touch()
    }

    fn remove_source(&self, source: &Source) -> PandoraResult<bool> {
        check_entity_input(source)?;
        let removed = self.source_refs().remove(source.id())?;
        self.node().touch_if(removed)
    }
}
