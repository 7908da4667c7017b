//! Vote projection: share × turnout × eligible voters.
//!
//! Any undefined input yields an undefined projection. Gaps are carried as
//! explicit `None` entries so callers can report them; they are never read
//! as zero votes.

use std::collections::BTreeMap;

use seat_core::ids::{ConstituencyId, PartyId};
use seat_core::inputs::InputSnapshot;
use seat_core::values::{Fraction, VoterCount};

use crate::PartyVotes;

/// Projected votes for one `(party, constituency)` cell.
///
/// Unrounded; `None` when any of the three inputs is undefined.
#[inline]
pub fn project(
    share: Option<Fraction>,
    turnout: Option<Fraction>,
    voters: Option<VoterCount>,
) -> Option<f64> {
    Some(share?.get() * turnout?.get() * voters?.get())
}

/// Projected vote table for every constituency named in a snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedVotes {
    by_constituency: BTreeMap<ConstituencyId, BTreeMap<PartyId, Option<f64>>>,
}

impl ProjectedVotes {
    /// True if at least one party runs in `c`.
    pub fn contains(&self, c: &ConstituencyId) -> bool {
        self.by_constituency.contains_key(c)
    }

    /// Defined votes for `c`, gaps excluded. `None` if `c` is absent.
    pub fn votes_for(&self, c: &ConstituencyId) -> Option<PartyVotes> {
        let row = self.by_constituency.get(c)?;
        Some(
            row.iter()
                .filter_map(|(p, v)| v.map(|v| (p.clone(), v)))
                .collect(),
        )
    }

    /// Every undefined cell, in canonical `(constituency, party)` order.
    pub fn gaps(&self) -> impl Iterator<Item = (&ConstituencyId, &PartyId)> + '_ {
        self.by_constituency.iter().flat_map(|(c, row)| {
            row.iter()
                .filter(|(_, v)| v.is_none())
                .map(move |(p, _)| (c, p))
        })
    }

    /// Flat view of every cell.
    pub fn rows(&self) -> impl Iterator<Item = (&ConstituencyId, &PartyId, Option<f64>)> + '_ {
        self.by_constituency
            .iter()
            .flat_map(|(c, row)| row.iter().map(move |(p, v)| (c, p, *v)))
    }

    pub fn len(&self) -> usize {
        self.by_constituency.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Project every `(party, constituency)` share in the snapshot.
///
/// Constituencies that carry turnout or voter data but no party shares do not
/// appear: no party runs there.
pub fn project_all(snapshot: &InputSnapshot) -> ProjectedVotes {
    let mut by_constituency: BTreeMap<ConstituencyId, BTreeMap<PartyId, Option<f64>>> =
        BTreeMap::new();
    for ((party, constituency), share) in &snapshot.shares {
        let turnout = snapshot.turnout.get(constituency).copied().flatten();
        let voters = snapshot.voters.get(constituency).copied().flatten();
        by_constituency
            .entry(constituency.clone())
            .or_default()
            .insert(party.clone(), project(*share, turnout, voters));
    }
    ProjectedVotes { by_constituency }
}
