//! Unit sanitizing and SI validation.
//!
//! # Invariants
//! - Sanitizing strips all whitespace and rewrites the micro prefix
//!   (`mu`, `µ`, `μ`) to `u`. Case is preserved: SI prefixes are
//!   case-sensitive (`mV` vs `MV`).
//! - Only atomic SI units (optional prefix, base/derived unit, optional
//!   integer power) are accepted. `none` and the empty string mean
//!   "dimensionless" and are always accepted.

use crate::error::{PandoraError, PandoraResult};
use once_cell::sync::Lazy;
use regex::Regex;

static ATOMIC_SI_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(Y|Z|E|P|T|G|M|k|h|da|d|c|m|u|n|p|f|a|z|y)?(m|g|s|A|K|mol|cd|Hz|N|Pa|J|W|C|V|F|S|Wb|T|H|lm|lx|Bq|Gy|Sv|kat|l|L|Ohm|%|dB|rad)([+-]?[1-9][0-9]*)?$",
    )
    .expect("valid SI unit regex")
});

/// Normalizes a raw unit string.
pub fn sanitize_unit(unit: &str) -> String {
    let deblanked: String = unit.chars().filter(|c| !c.is_whitespace()).collect();
    deblanked.replace("mu", "u").replace(['µ', 'μ'], "u")
}

/// Whether `unit` (already sanitized) is an atomic SI unit.
pub fn is_si_unit(unit: &str) -> bool {
    ATOMIC_SI_UNIT_RE.is_match(unit)
}

/// Sanitizes and validates one unit; returns the sanitized form.
///
/// # Errors
/// - `InvalidUnit` when the sanitized unit is non-empty, not `none` and not
///   an atomic SI unit.
pub fn validate_unit(unit: &str, context: &'static str) -> PandoraResult<String> {
    let sanitized = sanitize_unit(unit);
    if !sanitized.is_empty() && sanitized != "none" && !is_si_unit(&sanitized) {
        return Err(PandoraError::InvalidUnit {
            unit: sanitized,
            context,
        });
    }
    Ok(sanitized)
}

/// Validates every unit before returning any; the first bad unit fails the
/// whole list.
pub fn validate_units<S: AsRef<str>>(
    units: &[S],
    context: &'static str,
) -> PandoraResult<Vec<String>> {
    units
        .iter()
        .map(|unit| validate_unit(unit.as_ref(), context))
        .collect()
}
