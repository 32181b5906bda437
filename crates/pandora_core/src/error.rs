//! Error taxonomy shared by the storage layer and the entity model.
//!
//! # Invariants
//! - Every failure surfaces as a typed variant; no error codes, no silent
//!   defaults.
//! - `NotFound` and `OutOfBounds` name the collection kind they came from.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PandoraResult<T> = Result<T, PandoraError>;

#[derive(Debug)]
pub enum PandoraError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Filesystem error outside SQLite (e.g. truncating in overwrite mode).
    Io(std::io::Error),
    /// Requested id or name has no corresponding storage node.
    NotFound { kind: &'static str, id: String },
    /// Positional index is not below the current count.
    OutOfBounds {
        kind: &'static str,
        index: usize,
        count: usize,
    },
    /// A unit string is not an atomic SI unit.
    InvalidUnit { unit: String, context: &'static str },
    /// Malformed argument, e.g. a blank name or an entity with an empty id.
    InvalidInput(String),
    /// Persisted state cannot be decoded into the expected shape.
    InvalidData(String),
}

impl Display for PandoraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "unable to find {kind} with id `{id}`"),
            Self::OutOfBounds { kind, index, count } => {
                write!(f, "no {kind} at index {index} (count is {count})")
            }
            Self::InvalidUnit { unit, context } => write!(
                f,
                "unit `{unit}` is not an SI unit; only atomic SI units are supported ({context})"
            ),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for PandoraError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PandoraError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for PandoraError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for PandoraError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl PandoraError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns `true` for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
