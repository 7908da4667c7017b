//! Election inputs: defaults, user overrides, and the frozen per-run snapshot.
//!
//! A `(party, constituency)` key that is absent means the party does not run
//! there. A key that is present with `None` is a data gap: it stays undefined
//! all the way through projection and is never read as zero.

use std::collections::BTreeMap;

use crate::ids::{ConstituencyId, PartyId};
use crate::values::{Fraction, VoterCount};

/// Immutable input set consumed by one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub shares: BTreeMap<(PartyId, ConstituencyId), Option<Fraction>>,
    pub turnout: BTreeMap<ConstituencyId, Option<Fraction>>,
    pub voters: BTreeMap<ConstituencyId, Option<VoterCount>>,
}

/// Defaults plus user adjustments (the slider layer).
///
/// Overrides are kept apart from the defaults so a reset is lossless.
#[derive(Clone, Debug, Default)]
pub struct ElectionInputs {
    defaults: InputSnapshot,
    share_overrides: BTreeMap<(PartyId, ConstituencyId), Fraction>,
    turnout_overrides: BTreeMap<ConstituencyId, Fraction>,
    voter_overrides: BTreeMap<ConstituencyId, VoterCount>,
}

impl ElectionInputs {
    pub fn new(defaults: InputSnapshot) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &InputSnapshot {
        &self.defaults
    }

    pub fn set_share(&mut self, party: PartyId, constituency: ConstituencyId, share: Fraction) {
        self.share_overrides.insert((party, constituency), share);
    }

    pub fn set_turnout(&mut self, constituency: ConstituencyId, turnout: Fraction) {
        self.turnout_overrides.insert(constituency, turnout);
    }

    pub fn set_voters(&mut self, constituency: ConstituencyId, voters: VoterCount) {
        self.voter_overrides.insert(constituency, voters);
    }

    pub fn has_overrides(&self) -> bool {
        !(self.share_overrides.is_empty()
            && self.turnout_overrides.is_empty()
            && self.voter_overrides.is_empty())
    }

    /// Drop every override.
    pub fn reset(&mut self) {
        self.share_overrides.clear();
        self.turnout_overrides.clear();
        self.voter_overrides.clear();
    }

    /// Freeze defaults + overrides into the snapshot a run reads.
    /// An override fills a gap as well as replacing a default.
    pub fn snapshot(&self) -> InputSnapshot {
        let mut snap = self.defaults.clone();
        for (k, v) in &self.share_overrides {
            snap.shares.insert(k.clone(), Some(*v));
        }
        for (k, v) in &self.turnout_overrides {
            snap.turnout.insert(k.clone(), Some(*v));
        }
        for (k, v) in &self.voter_overrides {
            snap.voters.insert(k.clone(), Some(*v));
        }
        snap
    }
}
