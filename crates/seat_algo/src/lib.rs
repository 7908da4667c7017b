// crates/seat_algo/src/lib.rs
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use seat_core::ids::PartyId;
use seat_core::rng::TieCrumb;

// ----------------------------- Canonical per-constituency shapes ---------------------

/// Vote counts for one constituency, keyed (and therefore iterated) in
/// canonical `PartyId` order. Values are real-valued projections.
pub type PartyVotes = BTreeMap<PartyId, f64>;

/// Seat counts for one constituency.
pub type SeatMap = BTreeMap<PartyId, u32>;

/// Output of every apportionment method.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation {
    /// One entry per input party (zero-seat parties included).
    pub seats: SeatMap,
    /// True iff the last seat awarded was decided between exactly-equal
    /// quotients/remainders.
    pub last_seat_tie: bool,
    /// Seeded draws made while breaking ties (empty unless a RNG was supplied
    /// and a tie actually occurred).
    pub crumbs: Vec<TieCrumb>,
}

impl Allocation {
    pub fn total(&self) -> u64 {
        self.seats.values().map(|&s| u64::from(s)).sum()
    }
}

// ----------------------------- Projection / threshold --------------------------------

pub mod projection;
pub mod threshold;

pub use projection::{project, project_all, ProjectedVotes};
pub use threshold::{filter_by_threshold, ThresholdError};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    // File modules (actual implementations)
    pub mod highest_averages;
    pub mod dhondt;
    pub mod sainte_lague;
    pub mod largest_remainder;

    pub use dhondt::allocate_dhondt;
    pub use largest_remainder::{allocate_largest_remainder, Remainders};
    pub use sainte_lague::{allocate_modified_sainte_lague, allocate_sainte_lague};

    use core::fmt;

    use seat_core::ids::PartyId;

    use crate::PartyVotes;

    /// Shared failure modes for all methods.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AllocError {
        /// No parties supplied while seats > 0.
        NoEligibleParties,
        /// A vote count is zero, negative, or not finite. Callers must filter
        /// through the threshold step first.
        NonPositiveVotes(PartyId),
    }

    impl fmt::Display for AllocError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                AllocError::NoEligibleParties => f.write_str("no eligible parties"),
                AllocError::NonPositiveVotes(p) => write!(f, "non-positive or non-finite votes for {p}"),
            }
        }
    }

    impl std::error::Error for AllocError {}

    /// Entry check shared by every method.
    pub(crate) fn check_votes(votes: &PartyVotes) -> Result<(), AllocError> {
        if votes.is_empty() {
            return Err(AllocError::NoEligibleParties);
        }
        for (p, &v) in votes {
            if !(v.is_finite() && v > 0.0) {
                return Err(AllocError::NonPositiveVotes(p.clone()));
            }
        }
        Ok(())
    }
}

pub use allocation::AllocError;
