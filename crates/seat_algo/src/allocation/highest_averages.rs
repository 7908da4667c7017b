//! Shared highest-averages engine (D'Hondt and both Sainte-Laguë variants).
//!
//! Seats are awarded one at a time to the party with the largest current
//! quotient `v / d(s)`, where `s` is the seats it already holds. Divisors are
//! rationals `num / den`, so the quotient is `v * den / num` and two quotients
//! compare as `v_a * den_a * num_b` vs `v_b * den_b * num_a`. The modified
//! Sainte-Laguë first divisor `1.4` is `7 / 5`, which keeps exact ties exact.
//!
//! Determinism:
//! - Candidates are scanned in canonical `PartyId` order (the map's order).
//! - On an exact tie the first candidate wins, unless a `TieRng` is supplied.

use core::cmp::Ordering;

use seat_core::ids::PartyId;
use seat_core::rng::{TieCrumb, TieRng};

use super::{check_votes, AllocError};
use crate::{Allocation, PartyVotes, SeatMap};

/// Divisor sequence of a highest-averages method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divisors {
    /// 1, 2, 3, …
    DHondt,
    /// 1, 3, 5, …
    SainteLague,
    /// 1.4, 3, 5, …
    ModifiedSainteLague,
}

impl Divisors {
    /// Divisor for a party already holding `seats`, as `(num, den)`.
    #[inline]
    pub fn divisor(self, seats: u32) -> (f64, f64) {
        let s = f64::from(seats);
        match self {
            Divisors::DHondt => (s + 1.0, 1.0),
            Divisors::SainteLague => (2.0 * s + 1.0, 1.0),
            Divisors::ModifiedSainteLague if seats == 0 => (7.0, 5.0),
            Divisors::ModifiedSainteLague => (2.0 * s + 1.0, 1.0),
        }
    }
}

/// Compare the quotients of `(v_a, s_a)` and `(v_b, s_b)` without dividing.
#[inline]
fn cmp_quotients(div: Divisors, v_a: f64, s_a: u32, v_b: f64, s_b: u32) -> Ordering {
    let (num_a, den_a) = div.divisor(s_a);
    let (num_b, den_b) = div.divisor(s_b);
    let lhs = v_a * den_a * num_b;
    let rhs = v_b * den_b * num_a;
    lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
}

/// Run the sequential award for `seats` seats.
pub fn allocate_highest_averages(
    div: Divisors,
    seats: u32,
    votes: &PartyVotes,
    mut rng: Option<&mut TieRng>,
) -> Result<Allocation, AllocError> {
    let mut alloc: SeatMap = votes.keys().cloned().map(|p| (p, 0)).collect();
    if seats == 0 {
        return Ok(Allocation {
            seats: alloc,
            last_seat_tie: false,
            crumbs: Vec::new(),
        });
    }
    check_votes(votes)?;

    let mut crumbs: Vec<TieCrumb> = Vec::new();
    let mut last_seat_tie = false;

    for round in 1..=seats {
        let (winner, tied) = next_award(div, &alloc, votes, round, rng.as_deref_mut(), &mut crumbs);
        if let Some(s) = alloc.get_mut(&winner) {
            *s += 1;
        }
        last_seat_tie = tied;
    }

    Ok(Allocation {
        seats: alloc,
        last_seat_tie,
        crumbs,
    })
}

/// Argmax of the current quotient; returns the winner and whether it was tied.
fn next_award(
    div: Divisors,
    seats_so_far: &SeatMap,
    votes: &PartyVotes,
    round: u32,
    rng: Option<&mut TieRng>,
    crumbs: &mut Vec<TieCrumb>,
) -> (PartyId, bool) {
    let mut best: Vec<&PartyId> = Vec::new();
    let mut best_v = 0.0_f64;
    let mut best_s = 0_u32;

    for (id, &v) in votes {
        let s = seats_so_far.get(id).copied().unwrap_or(0);
        if best.is_empty() {
            best.push(id);
            best_v = v;
            best_s = s;
            continue;
        }
        match cmp_quotients(div, v, s, best_v, best_s) {
            Ordering::Greater => {
                best.clear();
                best.push(id);
                best_v = v;
                best_s = s;
            }
            Ordering::Equal => best.push(id),
            Ordering::Less => {}
        }
    }

    let tied = best.len() > 1;
    let pick = match rng {
        Some(rng) if tied => {
            let ctx = format!("seat-{round}");
            match rng.draw(&ctx, best.len()) {
                Some((i, crumb)) => {
                    crumbs.push(crumb);
                    i
                }
                None => 0,
            }
        }
        // `votes` iterates in canonical order, so index 0 is the smallest id.
        _ => 0,
    };
    (best[pick].clone(), tied)
}
