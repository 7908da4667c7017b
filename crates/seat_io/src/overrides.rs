//! Command-line equivalents of the input sliders.
//!
//! - share:   `PARTY@CONSTITUENCY=12.5%` (or a fraction, `0.125`)
//! - turnout: `CONSTITUENCY=61%`
//! - voters:  `CONSTITUENCY=370000`
//!
//! Labels may contain spaces; the value is everything after the last `=`.

use core::str::FromStr;

use seat_core::ids::{ConstituencyId, PartyId};
use seat_core::inputs::ElectionInputs;
use seat_core::values::{Fraction, VoterCount};

use crate::percent::parse_percent;
use crate::scenario::Scenario;
use crate::{IoError, IoResult};

#[derive(Clone, Debug, PartialEq)]
pub struct PartyShareOverride {
    pub party: PartyId,
    pub constituency: ConstituencyId,
    pub share: Fraction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnoutOverride {
    pub constituency: ConstituencyId,
    pub turnout: Fraction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VotersOverride {
    pub constituency: ConstituencyId,
    pub voters: VoterCount,
}

fn split_value(s: &str) -> IoResult<(&str, &str)> {
    s.rsplit_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| IoError::Invalid(format!("expected KEY=VALUE, got {s:?}")))
}

/// `"12.5%"` or a plain fraction in [0, 1].
fn parse_fraction(s: &str) -> IoResult<Fraction> {
    let parsed = if s.ends_with('%') {
        parse_percent(s)
    } else {
        s.parse::<f64>().ok().and_then(|v| Fraction::new(v).ok())
    };
    parsed.ok_or_else(|| IoError::Invalid(format!("not a share in [0, 1] or 0–100%: {s:?}")))
}

fn constituency(s: &str) -> IoResult<ConstituencyId> {
    ConstituencyId::new(s).map_err(|e| IoError::Invalid(format!("constituency {s:?}: {e}")))
}

impl FromStr for PartyShareOverride {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = split_value(s)?;
        let (party, c) = key
            .rsplit_once('@')
            .ok_or_else(|| IoError::Invalid(format!("expected PARTY@CONSTITUENCY, got {key:?}")))?;
        Ok(Self {
            party: PartyId::new(party.trim())
                .map_err(|e| IoError::Invalid(format!("party {party:?}: {e}")))?,
            constituency: constituency(c.trim())?,
            share: parse_fraction(value)?,
        })
    }
}

impl FromStr for TurnoutOverride {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = split_value(s)?;
        Ok(Self {
            constituency: constituency(key)?,
            turnout: parse_fraction(value)?,
        })
    }
}

impl FromStr for VotersOverride {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = split_value(s)?;
        let n: f64 = value
            .parse()
            .map_err(|_| IoError::Invalid(format!("voters must be a number: {value:?}")))?;
        Ok(Self {
            constituency: constituency(key)?,
            voters: VoterCount::new(n).map_err(|e| IoError::Invalid(format!("{key}: {e}")))?,
        })
    }
}

/// Every adjustment requested for one run.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub shares: Vec<PartyShareOverride>,
    pub turnout: Vec<TurnoutOverride>,
    pub voters: Vec<VotersOverride>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty() && self.turnout.is_empty() && self.voters.is_empty()
    }

    /// Reject overrides that name a party or constituency the scenario lacks.
    pub fn check_against(&self, scenario: &Scenario) -> IoResult<()> {
        let known_c = |c: &ConstituencyId| scenario.constituencies.iter().any(|d| &d.id == c);
        let known_p = |p: &PartyId| scenario.parties.iter().any(|d| &d.id == p);

        for o in &self.shares {
            if !known_p(&o.party) {
                return Err(IoError::Invalid(format!("unknown party {}", o.party)));
            }
            if !known_c(&o.constituency) {
                return Err(IoError::Invalid(format!("unknown constituency {}", o.constituency)));
            }
        }
        let named = self
            .turnout
            .iter()
            .map(|o| &o.constituency)
            .chain(self.voters.iter().map(|o| &o.constituency));
        for c in named {
            if !known_c(c) {
                return Err(IoError::Invalid(format!("unknown constituency {c}")));
            }
        }
        Ok(())
    }

    /// Later entries win when the same cell is named twice.
    pub fn apply(&self, inputs: &mut ElectionInputs) {
        for o in &self.shares {
            inputs.set_share(o.party.clone(), o.constituency.clone(), o.share);
        }
        for o in &self.turnout {
            inputs.set_turnout(o.constituency.clone(), o.turnout);
        }
        for o in &self.voters {
            inputs.set_voters(o.constituency.clone(), o.voters);
        }
    }
}
