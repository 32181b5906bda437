//! Core entity layer of the pandora data format.
//!
//! A pandora file is a tree of typed entities (blocks, sources, data arrays,
//! tags, multi tags, features and metadata sections) stored as nodes of a
//! single SQLite file. This crate resolves id references between entities,
//! searches nested source trees and iterates the parent-linked section
//! forest.

pub mod db;
pub mod entity;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod util;

pub use entity::{
    Collection, Entity, EntityWithMetadata, NamedEntity, Nested, ReferenceList, SectionIter,
};
pub use error::{PandoraError, PandoraResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::block::{Block, BlockScope};
pub use model::data_array::DataArray;
pub use model::feature::{Feature, LinkType};
pub use model::file::File;
pub use model::multi_tag::MultiTag;
pub use model::section::Section;
pub use model::source::Source;
pub use model::source_refs::EntityWithSources;
pub use model::tag::{BaseTag, Tag};
pub use store::{AttrValue, FileMode, Group, Storage};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
