//! Hierarchical storage collaborator backed by one SQLite file.
//!
//! # Responsibility
//! - Expose named child groups, per-node attributes, existence checks,
//!   counts and ordered enumeration by index.
//! - Own the SQLite connection behind a shared, reference-counted handle.
//!
//! # Invariants
//! - Child enumeration is ordered by name, so `object_name(i)` is stable as
//!   long as the group is not mutated.
//! - Removing a group cascades to all descendant nodes and attributes.
//! - The connection closes when the last `Storage`/`Group` handle drops.
//! - Handles are `!Send`; callers serialize access to one file.

mod attr;
mod group;

pub use attr::AttrValue;
pub use group::Group;

use crate::db::{open_db, open_db_in_memory, open_db_read_only};
use crate::error::PandoraResult;
use log::info;
use rusqlite::Connection;
use std::path::Path;
use std::rc::Rc;

pub(crate) const ROOT_NODE_ID: i64 = 1;

/// Access mode used when opening a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Open an existing file without write access.
    ReadOnly,
    /// Open an existing file or create a new one.
    ReadWrite,
    /// Discard any existing file and start empty.
    Overwrite,
}

/// Shared handle to an open storage file.
///
/// Cloning increments the handle count; the underlying connection is
/// released when the last clone (including clones held by `Group`s) drops.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Rc<StorageInner>,
}

#[derive(Debug)]
struct StorageInner {
    conn: Connection,
    label: String,
    mode: FileMode,
}

impl Drop for StorageInner {
    fn drop(&mut self) {
        info!(
            "event=storage_close module=store status=ok target={}",
            self.label
        );
    }
}

impl Storage {
    /// Opens a storage file at `path` using `mode`.
    pub fn open(path: impl AsRef<Path>, mode: FileMode) -> PandoraResult<Self> {
        let path = path.as_ref();
        let conn = match mode {
            FileMode::ReadOnly => open_db_read_only(path)?,
            FileMode::ReadWrite => open_db(path)?,
            FileMode::Overwrite => {
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
                open_db(path)?
            }
        };
        Ok(Self::from_connection(conn, path.display().to_string(), mode))
    }

    /// Opens a fresh in-memory storage.
    pub fn in_memory() -> PandoraResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::from_connection(
            conn,
            ":memory:".to_string(),
            FileMode::ReadWrite,
        ))
    }

    fn from_connection(conn: Connection, label: String, mode: FileMode) -> Self {
        info!(
            "event=storage_open module=store status=ok target={} mode={:?}",
            label, mode
        );
        Self {
            inner: Rc::new(StorageInner { conn, label, mode }),
        }
    }

    /// Returns the root group of this file.
    pub fn root(&self) -> Group {
        Group::new(self.clone(), ROOT_NODE_ID, "/".to_string())
    }

    /// Mode the file was opened with.
    pub fn mode(&self) -> FileMode {
        self.inner.mode
    }

    /// Number of live handles (storages and groups) sharing this file.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Whether both handles refer to the same open file.
    pub fn same_file(&self, other: &Storage) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.inner.conn
    }
}
