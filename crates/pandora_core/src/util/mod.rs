//! Small helpers shared by the entity model.
//!
//! # Responsibility
//! - Generate collection-scoped entity ids.
//! - Sanitize and validate unit strings.
//! - Validate entity/name inputs before they reach storage.

pub mod ids;
pub mod units;

use crate::error::{PandoraError, PandoraResult};

/// Rejects blank names and ids.
pub(crate) fn check_name_or_id(value: &str, what: &str) -> PandoraResult<()> {
    if value.trim().is_empty() {
        return Err(PandoraError::InvalidInput(format!("{what} must not be blank")));
    }
    Ok(())
}

/// Current wall clock as epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::check_name_or_id;

    #[test]
    fn blank_values_are_rejected() {
        assert!(check_name_or_id("  ", "name").is_err());
        assert!(check_name_or_id("", "id").is_err());
        assert!(check_name_or_id("trial", "name").is_ok());
    }
}
