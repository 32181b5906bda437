//! Typed entities of a pandora file.
//!
//! # Responsibility
//! - `File` owns the block collection and the metadata forest.
//! - Blocks own sources (nestable), data arrays, tags and multi tags.
//! - Tags reference data arrays and sources of their own block.
//!
//! # Invariants
//! - Every entity is a node in the file's storage tree; references between
//!   entities are stored as ids and resolved on demand.

pub mod block;
pub mod data_array;
pub mod feature;
pub mod file;
pub mod multi_tag;
pub mod section;
pub mod source;
pub mod source_refs;
pub mod tag;
