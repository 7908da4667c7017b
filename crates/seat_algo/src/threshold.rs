//! Legal entry threshold, applied before every apportionment call.

use core::fmt;

use seat_core::values::Fraction;

use crate::PartyVotes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdError {
    /// Vote total is zero (or not a positive finite number); shares are undefined.
    DivisionUndefined,
}

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdError::DivisionUndefined => f.write_str("vote total is zero; shares undefined"),
        }
    }
}

impl std::error::Error for ThresholdError {}

/// Slack on the share comparison. Projected votes are float products, so a
/// share that is exactly on the threshold can land a few ulps below it.
pub const SHARE_TOLERANCE: f64 = 1e-12;

/// Keep parties with positive votes whose share of the total meets the
/// threshold (inclusive, within `SHARE_TOLERANCE`).
pub fn filter_by_threshold(
    votes: &PartyVotes,
    threshold: Fraction,
) -> Result<PartyVotes, ThresholdError> {
    let total: f64 = votes.values().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(ThresholdError::DivisionUndefined);
    }
    let t = threshold.get();
    Ok(votes
        .iter()
        .filter(|(_, &v)| v > 0.0 && v / total >= t - SHARE_TOLERANCE)
        .map(|(p, &v)| (p.clone(), v))
        .collect())
}
