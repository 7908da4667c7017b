//! D'Hondt (divisors 1, 2, 3, …).
//!
//! Callers pass threshold-filtered votes; see `crate::threshold`.

use seat_core::rng::TieRng;

use super::highest_averages::{allocate_highest_averages, Divisors};
use super::AllocError;
use crate::{Allocation, PartyVotes};

/// Allocate `seats` by D'Hondt. `rng` is consulted only on exact ties;
/// without one the tie goes to the smallest `PartyId`.
pub fn allocate_dhondt(
    seats: u32,
    votes: &PartyVotes,
    rng: Option<&mut TieRng>,
) -> Result<Allocation, AllocError> {
    allocate_highest_averages(Divisors::DHondt, seats, votes, rng)
}
