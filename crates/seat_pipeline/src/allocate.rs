//! ALLOCATE stage: per-constituency seat allocation.
//!
//! Input: the projected vote table, the policy table and the tie policy.
//! Output: flat `(party, constituency) -> seats` rows, one outcome per
//! allocated constituency, tie records and diagnostics.
//!
//! Constituencies are walked in stable `ConstituencyId` order. A seeded tie
//! policy draws from one stream shared by all constituencies, so a fixed seed
//! replays the whole run.

use serde::Serialize;
use tracing::debug;

use seat_algo::allocation::{
    allocate_dhondt, allocate_largest_remainder, allocate_modified_sainte_lague,
    allocate_sainte_lague,
};
use seat_algo::{filter_by_threshold, Allocation, PartyVotes, ProjectedVotes, ThresholdError};
use seat_core::ids::{ConstituencyId, PartyId};
use seat_core::rng::{TieCrumb, TieRng};
use seat_core::variables::{ConstituencyPolicy, Method, PolicyTable, QuotaKind, TiePolicy};

use crate::diagnostics::{Diagnostic, Diagnostics, NoVotesReason};
use crate::PipelineError;

/// Seats won by one party in one constituency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatRow {
    pub party: PartyId,
    pub constituency: ConstituencyId,
    pub seats: u32,
}

/// Summary of one allocated constituency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConstituencyOutcome {
    pub constituency: ConstituencyId,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaKind>,
    pub seats: u32,
    /// Parties that passed the threshold.
    pub qualifying: usize,
    pub last_seat_tie: bool,
}

/// One seeded draw, in draw order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TieRecord {
    pub constituency: ConstituencyId,
    pub ctx: String,
    pub pick: u64,
    pub word_index: u64,
}

impl TieRecord {
    fn from_crumb(constituency: &ConstituencyId, crumb: TieCrumb) -> Self {
        Self {
            constituency: constituency.clone(),
            ctx: crumb.ctx,
            pick: crumb.pick as u64,
            word_index: crumb.word_index,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AllocationRun {
    pub rows: Vec<SeatRow>,
    pub outcomes: Vec<ConstituencyOutcome>,
    pub ties: Vec<TieRecord>,
    pub diagnostics: Diagnostics,
}

impl AllocationRun {
    /// Σ seats over every row.
    pub fn total_seats(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.seats)).sum()
    }
}

/// Allocate every constituency in `table`.
///
/// Skipped constituencies raise a diagnostic and contribute no rows; they
/// never abort the run.
pub fn allocate_all(
    projected: &ProjectedVotes,
    table: &PolicyTable,
    tie_policy: TiePolicy,
) -> Result<AllocationRun, PipelineError> {
    let mut rng = match tie_policy {
        TiePolicy::Random { seed } => Some(TieRng::seeded(seed)),
        TiePolicy::Lexicographic => None,
    };

    let mut run = AllocationRun::default();

    for policy in table.iter() {
        let c = &policy.constituency;

        for (_, party) in projected.gaps().filter(|(gc, _)| *gc == c) {
            run.diagnostics.push(Diagnostic::MissingDataGap {
                party: party.clone(),
                constituency: c.clone(),
            });
        }

        let Some(votes) = projected.votes_for(c) else {
            run.diagnostics
                .push(Diagnostic::ConfigurationMismatch { constituency: c.clone() });
            continue;
        };

        let qualifying = match filter_by_threshold(&votes, policy.threshold) {
            Ok(q) => q,
            Err(ThresholdError::DivisionUndefined) => {
                run.diagnostics.push(Diagnostic::NoValidVotes {
                    constituency: c.clone(),
                    reason: NoVotesReason::ZeroTotal,
                });
                continue;
            }
        };
        if qualifying.is_empty() {
            run.diagnostics.push(Diagnostic::NoValidVotes {
                constituency: c.clone(),
                reason: NoVotesReason::NoQualifyingParty,
            });
            continue;
        }

        let alloc = allocate_one(policy, &qualifying, rng.as_mut())?;
        debug!(
            constituency = %c,
            method = policy.method.token(),
            seats = policy.seats,
            qualifying = qualifying.len(),
            "allocated"
        );

        if alloc.last_seat_tie {
            run.diagnostics.push(Diagnostic::TieResolved {
                constituency: c.clone(),
                seeded: !alloc.crumbs.is_empty(),
            });
        }
        run.ties
            .extend(alloc.crumbs.iter().cloned().map(|cr| TieRecord::from_crumb(c, cr)));
        run.outcomes.push(ConstituencyOutcome {
            constituency: c.clone(),
            method: policy.method.token(),
            quota: match policy.method {
                Method::LargestRemainder { quota } => Some(quota),
                _ => None,
            },
            seats: policy.seats,
            qualifying: qualifying.len(),
            last_seat_tie: alloc.last_seat_tie,
        });
        run.rows.extend(alloc.seats.into_iter().map(|(party, seats)| SeatRow {
            party,
            constituency: c.clone(),
            seats,
        }));
    }

    Ok(run)
}

/// Dispatch one constituency on its method.
fn allocate_one(
    policy: &ConstituencyPolicy,
    votes: &PartyVotes,
    rng: Option<&mut TieRng>,
) -> Result<Allocation, PipelineError> {
    let out = match policy.method {
        Method::DHondt => allocate_dhondt(policy.seats, votes, rng),
        Method::SainteLague => allocate_sainte_lague(policy.seats, votes, rng),
        Method::ModifiedSainteLague => allocate_modified_sainte_lague(policy.seats, votes, rng),
        Method::LargestRemainder { quota } => {
            allocate_largest_remainder(policy.seats, votes, quota, rng)
        }
    };
    out.map_err(|source| PipelineError::Allocate {
        constituency: policy.constituency.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_core::inputs::InputSnapshot;
    use seat_core::values::{Fraction, VoterCount};

    fn c(s: &str) -> ConstituencyId {
        ConstituencyId::new(s).unwrap()
    }
    fn p(s: &str) -> PartyId {
        PartyId::new(s).unwrap()
    }

    fn rule(constituency: &str, method: Method, seats: u32, threshold: f64) -> ConstituencyPolicy {
        ConstituencyPolicy {
            constituency: c(constituency),
            method,
            seats,
            threshold: Fraction::new(threshold).unwrap(),
        }
    }

    /// One constituency, voters = 1000, turnout = 100%, shares as given.
    fn snapshot(constituency: &str, shares: &[(&str, Option<f64>)], voters: f64) -> InputSnapshot {
        let mut s = InputSnapshot::default();
        for (party, share) in shares {
            s.shares.insert(
                (p(party), c(constituency)),
                share.map(|v| Fraction::new(v).unwrap()),
            );
        }
        s.turnout.insert(c(constituency), Some(Fraction::ONE));
        s.voters.insert(c(constituency), Some(VoterCount::new(voters).unwrap()));
        s
    }

    fn seats_in(run: &AllocationRun, constituency: &str) -> Vec<(String, u32)> {
        run.rows
            .iter()
            .filter(|r| r.constituency.as_str() == constituency)
            .map(|r| (r.party.to_string(), r.seats))
            .collect()
    }

    #[test]
    fn dispatches_on_method_and_conserves_seats() {
        let snap = snapshot("Alpha", &[("A", Some(0.5)), ("B", Some(0.4)), ("C", Some(0.1))], 1000.0);
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([rule(
            "Alpha",
            Method::LargestRemainder { quota: QuotaKind::Hare },
            10,
            0.0,
        )])
        .unwrap();

        let run = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert_eq!(
            seats_in(&run, "Alpha"),
            [("A".into(), 5), ("B".into(), 4), ("C".into(), 1)]
        );
        assert_eq!(run.total_seats(), 10);
        assert_eq!(run.outcomes[0].quota, Some(QuotaKind::Hare));
        assert!(run.diagnostics.is_empty());
    }

    #[test]
    fn constituency_missing_from_votes_is_skipped() {
        let snap = snapshot("Alpha", &[("A", Some(1.0))], 1000.0);
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([
            rule("Alpha", Method::DHondt, 3, 0.0),
            rule("Beta", Method::DHondt, 4, 0.0),
        ])
        .unwrap();

        let run = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert_eq!(run.total_seats(), 3);
        assert!(seats_in(&run, "Beta").is_empty());
        assert!(run.outcomes.iter().all(|o| o.constituency != c("Beta")));
        let d: Vec<_> = run.diagnostics.iter().cloned().collect();
        assert_eq!(d, [Diagnostic::ConfigurationMismatch { constituency: c("Beta") }]);
    }

    #[test]
    fn zero_eligible_voters_is_no_valid_votes() {
        let snap = snapshot("Alpha", &[("A", Some(0.6)), ("B", Some(0.4))], 0.0);
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([rule("Alpha", Method::SainteLague, 5, 0.0)]).unwrap();

        let run = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert!(run.rows.is_empty());
        let d: Vec<_> = run.diagnostics.iter().cloned().collect();
        assert_eq!(
            d,
            [Diagnostic::NoValidVotes {
                constituency: c("Alpha"),
                reason: NoVotesReason::ZeroTotal
            }]
        );
    }

    #[test]
    fn threshold_can_leave_no_qualifying_party() {
        // Three equal parties at 33.3% against a 50% threshold.
        let third = 1.0 / 3.0;
        let snap = snapshot(
            "Alpha",
            &[("A", Some(third)), ("B", Some(third)), ("C", Some(third))],
            900.0,
        );
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([rule("Alpha", Method::DHondt, 2, 0.5)]).unwrap();

        let run = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert!(run.rows.is_empty());
        assert!(matches!(
            run.diagnostics.iter().next(),
            Some(Diagnostic::NoValidVotes { reason: NoVotesReason::NoQualifyingParty, .. })
        ));
    }

    #[test]
    fn gaps_are_reported_and_left_out() {
        let snap = snapshot("Alpha", &[("A", Some(0.7)), ("B", None), ("C", Some(0.3))], 1000.0);
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([rule("Alpha", Method::DHondt, 4, 0.0)]).unwrap();

        let run = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert_eq!(seats_in(&run, "Alpha"), [("A".into(), 3), ("C".into(), 1)]);
        let d: Vec<_> = run.diagnostics.iter().cloned().collect();
        assert_eq!(
            d,
            [Diagnostic::MissingDataGap { party: p("B"), constituency: c("Alpha") }]
        );
    }

    #[test]
    fn below_threshold_parties_get_no_row_but_zero_seat_qualifiers_do() {
        let snap = snapshot(
            "Alpha",
            &[("A", Some(0.60)), ("B", Some(0.36)), ("C", Some(0.04))],
            1000.0,
        );
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([rule("Alpha", Method::DHondt, 1, 0.05)]).unwrap();

        let run = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert_eq!(seats_in(&run, "Alpha"), [("A".into(), 1), ("B".into(), 0)]);
        assert_eq!(run.outcomes[0].qualifying, 2);
    }

    #[test]
    fn exact_tie_is_reported_and_seeded_draws_are_recorded() {
        let snap = snapshot("Alpha", &[("A", Some(0.5)), ("B", Some(0.5))], 1000.0);
        let projected = seat_algo::project_all(&snap);
        let table = PolicyTable::from_rules([rule("Alpha", Method::DHondt, 1, 0.0)]).unwrap();

        let lex = allocate_all(&projected, &table, TiePolicy::Lexicographic).unwrap();
        assert_eq!(seats_in(&lex, "Alpha"), [("A".into(), 1), ("B".into(), 0)]);
        assert!(lex.ties.is_empty());
        assert!(lex
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::TieResolved { seeded: false, .. })));

        let seeded = allocate_all(&projected, &table, TiePolicy::Random { seed: 7 }).unwrap();
        assert_eq!(seeded.total_seats(), 1);
        assert_eq!(seeded.ties.len(), 1);
        assert_eq!(seeded.ties[0].ctx, "seat-1");
        assert_eq!(seeded.ties[0].word_index, 1);

        let again = allocate_all(&projected, &table, TiePolicy::Random { seed: 7 }).unwrap();
        assert_eq!(seeded.rows, again.rows);
        assert_eq!(seeded.ties, again.ties);
    }
}
