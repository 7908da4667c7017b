//! Non-fatal run diagnostics.
//!
//! Every diagnostic is collected into the run result and logged once, at the
//! point it is raised.

use core::fmt;

use serde::Serialize;

use seat_core::ids::{ConstituencyId, PartyId};

/// Why a constituency produced no allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoVotesReason {
    /// Projected votes sum to zero (or every cell is a gap).
    ZeroTotal,
    /// Votes exist but no party passes the threshold.
    NoQualifyingParty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    MissingDataGap {
        party: PartyId,
        constituency: ConstituencyId,
    },
    NoValidVotes {
        constituency: ConstituencyId,
        reason: NoVotesReason,
    },
    ConfigurationMismatch {
        constituency: ConstituencyId,
    },
    UnmappedParty {
        party: PartyId,
    },
    TieResolved {
        constituency: ConstituencyId,
        /// True when the tie was drawn from the seeded stream.
        seeded: bool,
    },
}

impl Diagnostic {
    /// Machine token (matches the serialized `kind`).
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MissingDataGap { .. } => "missing_data_gap",
            Diagnostic::NoValidVotes { .. } => "no_valid_votes",
            Diagnostic::ConfigurationMismatch { .. } => "configuration_mismatch",
            Diagnostic::UnmappedParty { .. } => "unmapped_party",
            Diagnostic::TieResolved { .. } => "tie_resolved",
        }
    }

    /// Informational diagnostics never indicate missing or inconsistent data.
    pub fn is_info(&self) -> bool {
        matches!(self, Diagnostic::TieResolved { .. })
    }

    /// Log through `tracing` at the matching level.
    pub fn emit(&self) {
        if self.is_info() {
            tracing::info!(kind = self.kind(), "{self}");
        } else {
            tracing::warn!(kind = self.kind(), "{self}");
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingDataGap { party, constituency } => {
                write!(f, "missing data for {party} in {constituency}; treated as undefined")
            }
            Diagnostic::NoValidVotes { constituency, reason } => match reason {
                NoVotesReason::ZeroTotal => write!(f, "no valid votes found for {constituency}"),
                NoVotesReason::NoQualifyingParty => {
                    write!(f, "no party passes the threshold in {constituency}")
                }
            },
            Diagnostic::ConfigurationMismatch { constituency } => {
                write!(f, "column for {constituency} not found in the data")
            }
            Diagnostic::UnmappedParty { party } => {
                write!(f, "{party} has no political group; counted under Unknown")
            }
            Diagnostic::TieResolved { constituency, seeded } => {
                let how = if *seeded { "seeded draw" } else { "party order" };
                write!(f, "last seat in {constituency} decided by {how}")
            }
        }
    }
}

/// Ordered sink; preserves raise order.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        d.emit();
        self.items.push(d);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        // Already emitted when first raised.
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let d = Diagnostic::NoValidVotes {
            constituency: ConstituencyId::new("Malta").unwrap(),
            reason: NoVotesReason::ZeroTotal,
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"kind": "no_valid_votes", "constituency": "Malta", "reason": "zero_total"})
        );
        assert_eq!(d.kind(), "no_valid_votes");
    }

    #[test]
    fn sink_keeps_order() {
        let mut sink = Diagnostics::default();
        sink.push(Diagnostic::UnmappedParty { party: PartyId::new("X").unwrap() });
        sink.push(Diagnostic::ConfigurationMismatch {
            constituency: ConstituencyId::new("Malta").unwrap(),
        });
        let kinds: Vec<&str> = sink.iter().map(Diagnostic::kind).collect();
        assert_eq!(kinds, ["unmapped_party", "configuration_mismatch"]);
    }
}
