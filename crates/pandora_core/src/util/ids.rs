//! Entity id generation.
//!
//! Ids have the form `<prefix>_<token>` where the token is a random v4 UUID
//! in simple (hyphen-less) form. Uniqueness is only checked against the
//! collection the entity is created in.

use crate::error::PandoraResult;
use log::warn;
use uuid::Uuid;

/// Builds a new random id with `prefix`.
pub fn create_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Generates ids until `exists` reports a free one.
pub(crate) fn fresh_id(
    prefix: &str,
    exists: impl FnMut(&str) -> PandoraResult<bool>,
) -> PandoraResult<String> {
    fresh_id_with(prefix, exists, create_id)
}

fn fresh_id_with(
    prefix: &str,
    mut exists: impl FnMut(&str) -> PandoraResult<bool>,
    mut generate: impl FnMut(&str) -> String,
) -> PandoraResult<String> {
    let mut id = generate(prefix);
    while exists(&id)? {
        warn!("event=id_collision module=util status=retry prefix={prefix} id={id}");
        id = generate(prefix);
    }
    Ok(id)
}
