//! Percent strings at the input boundary.
//!
//! Source data writes shares and turnout as `"12.5%"`. A value that does not
//! parse is a data gap (`None`), never zero.

use seat_core::values::Fraction;
use serde::{Deserialize, Serialize};

/// Parse `"12.5%"` (surrounding whitespace tolerated) into a fraction.
///
/// Returns `None` when the `%` suffix is missing, the number is malformed or
/// not finite, or it falls outside `0%..=100%`.
pub fn parse_percent(s: &str) -> Option<Fraction> {
    let body = s.trim().strip_suffix('%')?.trim_end();
    let pct: f64 = body.parse().ok()?;
    Fraction::from_percent(pct).ok()
}

/// Wire form of a share / turnout cell: a fraction in `[0, 1]`, a percent
/// string, or `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShareCell {
    Fraction(f64),
    Percent(String),
}

impl ShareCell {
    /// Resolve to a typed fraction; anything unusable is a gap.
    pub fn resolve(&self) -> Option<Fraction> {
        match self {
            ShareCell::Fraction(v) => Fraction::new(*v).ok(),
            ShareCell::Percent(s) => parse_percent(s),
        }
    }
}

/// Resolve an optional cell; `null` / absent stays a gap.
pub fn resolve_cell(cell: Option<&ShareCell>) -> Option<Fraction> {
    cell.and_then(ShareCell::resolve)
}
