//! Schema steps for the node/attribute store.
//!
//! # Invariants
//! - Step `i` of `SCHEMA_STEPS` brings the file to schema version `i + 1`;
//!   steps are append-only.
//! - The applied version is mirrored to `PRAGMA user_version` inside the
//!   same transaction as the step itself.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(label, sql)` per schema version, oldest first.
const SCHEMA_STEPS: &[(&str, &str)] = &[
    ("nodes", include_str!("0001_nodes.sql")),
    ("attributes", include_str!("0002_attributes.sql")),
];

/// Schema version a fully migrated file carries.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Brings `conn` up to [`latest_version`] in one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let pending = pending_steps(current_user_version(conn)?)?;
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, label, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        info!("event=db_migrate module=db status=ok version={version} step={label}");
    }
    tx.commit()?;
    Ok(())
}

/// Steps still missing on a file at schema version `from`.
fn pending_steps(from: u32) -> DbResult<Vec<(u32, &'static str, &'static str)>> {
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }
    Ok(SCHEMA_STEPS
        .iter()
        .zip(1..)
        .skip(from as usize)
        .map(|((label, sql), version)| (version, *label, *sql))
        .collect())
}

pub(crate) fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
