//! Largest Remainder with selectable quota (Hare, Droop, Imperiali).
//!
//! - Thresholding happens upstream; `votes` are assumed filtered.
//! - Base seats are `floor(v / q)`, remainders `v mod q`.
//! - If `q == 0`, bases are 0 and remainders are the raw votes.
//! - Bases short of `seats`: leftovers go down the ranking
//!   (remainder ↓, votes ↓, `PartyId` ↑), cycling if more leftovers than parties.
//! - Bases over `seats` (Imperiali): trim from the bottom of the same ranking.
//!
//! A `TieRng` only reorders the tie group that straddles the leftover cut.

use core::cmp::Ordering;
use std::collections::BTreeMap;

use seat_core::ids::PartyId;
use seat_core::rng::{TieCrumb, TieRng};
use seat_core::variables::QuotaKind;

use super::{check_votes, AllocError};
use crate::{Allocation, PartyVotes, SeatMap};

/// `v mod q` per party.
pub type Remainders = BTreeMap<PartyId, f64>;

/// Allocate `seats` by largest remainder under `quota`.
pub fn allocate_largest_remainder(
    seats: u32,
    votes: &PartyVotes,
    quota: QuotaKind,
    rng: Option<&mut TieRng>,
) -> Result<Allocation, AllocError> {
    if seats == 0 {
        return Ok(Allocation {
            seats: votes.keys().cloned().map(|p| (p, 0)).collect(),
            last_seat_tie: false,
            crumbs: Vec::new(),
        });
    }
    check_votes(votes)?;

    let total: f64 = votes.values().sum();
    let q = quota.quota(total, seats);
    let (mut alloc, remainders) = floors_and_remainders(votes, q);

    let sum_floors: u64 = alloc.values().map(|&s| u64::from(s)).sum();
    let target = u64::from(seats);
    let mut last_seat_tie = false;
    let mut crumbs = Vec::new();

    if sum_floors < target {
        let needed = target - sum_floors;
        let mut ranking = rank(&remainders, votes);
        if let Some(rng) = rng {
            shuffle_straddling_tie(&mut ranking, &remainders, votes, needed, rng, &mut crumbs);
        }
        last_seat_tie = straddles_tie(&ranking, &remainders, votes, needed);
        distribute_leftovers(needed, &mut alloc, &ranking);
    } else if sum_floors > target {
        trim_over_allocation(target, &mut alloc, &remainders, votes);
    }

    debug_assert_eq!(alloc.values().map(|&s| u64::from(s)).sum::<u64>(), target);
    Ok(Allocation {
        seats: alloc,
        last_seat_tie,
        crumbs,
    })
}

/// Base seats and remainders for quota `q`.
pub fn floors_and_remainders(votes: &PartyVotes, q: f64) -> (SeatMap, Remainders) {
    let mut floors = SeatMap::new();
    let mut rems = Remainders::new();
    for (id, &v) in votes {
        if q > 0.0 {
            let r = v % q;
            // `(v - r) / q` is an integer up to rounding noise.
            let f = ((v - r) / q).round();
            floors.insert(id.clone(), f.clamp(0.0, f64::from(u32::MAX)) as u32);
            rems.insert(id.clone(), r);
        } else {
            floors.insert(id.clone(), 0);
            rems.insert(id.clone(), v);
        }
    }
    (floors, rems)
}

/// Leftover ranking: remainder ↓, votes ↓, `PartyId` ↑.
fn rank(remainders: &Remainders, votes: &PartyVotes) -> Vec<PartyId> {
    let mut ranking: Vec<PartyId> = remainders.keys().cloned().collect();
    ranking.sort_by(|a, b| cmp_rank(a, b, remainders, votes));
    ranking
}

fn cmp_rank(a: &PartyId, b: &PartyId, remainders: &Remainders, votes: &PartyVotes) -> Ordering {
    let key = |id: &PartyId| {
        (
            remainders.get(id).copied().unwrap_or(0.0),
            votes.get(id).copied().unwrap_or(0.0),
        )
    };
    let (ra, va) = key(a);
    let (rb, vb) = key(b);
    rb.total_cmp(&ra)
        .then_with(|| vb.total_cmp(&va))
        .then_with(|| a.cmp(b))
}

fn same_key(a: &PartyId, b: &PartyId, remainders: &Remainders, votes: &PartyVotes) -> bool {
    remainders.get(a) == remainders.get(b) && votes.get(a) == votes.get(b)
}

/// Position of the cut inside one pass of the ranking; `None` if the cut
/// falls on a pass boundary.
fn cut(n: usize, needed: u64) -> Option<usize> {
    let k = (needed % n as u64) as usize;
    (k > 0).then_some(k)
}

/// True if the last leftover seat was decided between equal keys.
fn straddles_tie(
    ranking: &[PartyId],
    remainders: &Remainders,
    votes: &PartyVotes,
    needed: u64,
) -> bool {
    match cut(ranking.len(), needed) {
        Some(k) => same_key(&ranking[k - 1], &ranking[k], remainders, votes),
        None => false,
    }
}

/// Redraw the tie group that straddles the cut, one winner at a time.
fn shuffle_straddling_tie(
    ranking: &mut [PartyId],
    remainders: &Remainders,
    votes: &PartyVotes,
    needed: u64,
    rng: &mut TieRng,
    crumbs: &mut Vec<TieCrumb>,
) {
    let n = ranking.len();
    let Some(k) = cut(n, needed) else { return };
    if !same_key(&ranking[k - 1], &ranking[k], remainders, votes) {
        return;
    }
    let mut lo = k - 1;
    while lo > 0 && same_key(&ranking[lo - 1], &ranking[lo], remainders, votes) {
        lo -= 1;
    }
    let mut hi = k + 1;
    while hi < n && same_key(&ranking[hi - 1], &ranking[hi], remainders, votes) {
        hi += 1;
    }
    for slot in lo..k {
        let ctx = format!("leftover-{}", slot + 1);
        if let Some((i, crumb)) = rng.draw(&ctx, hi - slot) {
            ranking.swap(slot, slot + i);
            crumbs.push(crumb);
        }
    }
}

fn distribute_leftovers(needed: u64, alloc: &mut SeatMap, ranking: &[PartyId]) {
    if ranking.is_empty() {
        return;
    }
    for id in ranking.iter().cycle().take(needed as usize) {
        if let Some(s) = alloc.get_mut(id) {
            *s += 1;
        }
    }
}

/// Remove seats from the bottom of the leftover ranking until `target` holds.
fn trim_over_allocation(
    target: u64,
    alloc: &mut SeatMap,
    remainders: &Remainders,
    votes: &PartyVotes,
) {
    let mut total: u64 = alloc.values().map(|&s| u64::from(s)).sum();
    let mut ranking = rank(remainders, votes);
    ranking.reverse();
    while total > target {
        let before = total;
        for id in &ranking {
            if total <= target {
                break;
            }
            if let Some(s) = alloc.get_mut(id) {
                if *s > 0 {
                    *s -= 1;
                    total -= 1;
                }
            }
        }
        if total == before {
            break;
        }
    }
}
