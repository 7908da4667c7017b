//! Scenario files: default shares, turnout, eligible voters, party → group
//! mapping, and which policy table to apply.
//!
//! ```json
//! {
//!   "name": "demo",
//!   "policy_preset": "eu2024",
//!   "constituencies": [{"id": "Malta", "turnout": "72.7%", "eligible_voters": 370000}],
//!   "parties": [{"id": "PL", "group": "S&D", "shares": {"Malta": "45.3%"}}]
//! }
//! ```
//!
//! A party lists only the constituencies it runs in. A listed share that is
//! `null` or unparsable is a data gap.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use seat_core::ids::{ConstituencyId, GroupLabel, PartyId};
use seat_core::inputs::InputSnapshot;
use seat_core::values::VoterCount;
use seat_core::variables::PolicyTable;

use crate::percent::{resolve_cell, ShareCell};
use crate::presets::policy_preset;
use crate::{IoError, IoResult};

/// Preset applied when a scenario names no policy at all.
pub const DEFAULT_POLICY_PRESET: &str = "eu2024";

const MAX_SCENARIO_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    /// Name of a built-in policy table.
    #[serde(default)]
    pub policy_preset: Option<String>,
    /// Inline policy table; mutually exclusive with `policy_preset`.
    #[serde(default)]
    pub policy: Option<PolicyTable>,
    pub constituencies: Vec<ConstituencyDefaults>,
    pub parties: Vec<PartyDefaults>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstituencyDefaults {
    pub id: ConstituencyId,
    #[serde(default)]
    pub turnout: Option<ShareCell>,
    #[serde(default)]
    pub eligible_voters: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartyDefaults {
    pub id: PartyId,
    /// Political group; absent means unmapped.
    #[serde(default)]
    pub group: Option<GroupLabel>,
    #[serde(default)]
    pub shares: BTreeMap<ConstituencyId, Option<ShareCell>>,
}

impl Scenario {
    /// Reject duplicate ids and negative / non-finite voter counts.
    pub fn validate(&self) -> IoResult<()> {
        let mut seen = BTreeSet::new();
        for c in &self.constituencies {
            if !seen.insert(&c.id) {
                return Err(IoError::Invalid(format!("duplicate constituency {}", c.id)));
            }
            if let Some(v) = c.eligible_voters {
                VoterCount::new(v)
                    .map_err(|e| IoError::Invalid(format!("{}: eligible_voters: {e}", c.id)))?;
            }
        }
        let mut seen = BTreeSet::new();
        for p in &self.parties {
            if !seen.insert(&p.id) {
                return Err(IoError::Invalid(format!("duplicate party {}", p.id)));
            }
        }
        if self.policy.is_some() && self.policy_preset.is_some() {
            return Err(IoError::Invalid(
                "policy and policy_preset are mutually exclusive".into(),
            ));
        }
        Ok(())
    }

    /// Defaults as an input snapshot. Gaps stay `None`.
    pub fn defaults(&self) -> InputSnapshot {
        let mut snap = InputSnapshot::default();
        for c in &self.constituencies {
            snap.turnout.insert(c.id.clone(), resolve_cell(c.turnout.as_ref()));
            snap.voters.insert(
                c.id.clone(),
                c.eligible_voters.and_then(|v| VoterCount::new(v).ok()),
            );
        }
        for p in &self.parties {
            for (c, cell) in &p.shares {
                snap.shares
                    .insert((p.id.clone(), c.clone()), resolve_cell(cell.as_ref()));
            }
        }
        snap
    }

    /// Party → group for every party that names one.
    pub fn group_mapping(&self) -> BTreeMap<PartyId, GroupLabel> {
        self.parties
            .iter()
            .filter_map(|p| p.group.clone().map(|g| (p.id.clone(), g)))
            .collect()
    }

    /// Inline table, else the named preset, else the default preset.
    pub fn policy_table(&self) -> IoResult<PolicyTable> {
        if let Some(t) = &self.policy {
            return Ok(t.clone());
        }
        policy_preset(self.policy_preset.as_deref().unwrap_or(DEFAULT_POLICY_PRESET))
    }
}

pub fn parse_scenario(s: &str) -> IoResult<Scenario> {
    let sc: Scenario = serde_json::from_str(s)?;
    sc.validate()?;
    Ok(sc)
}

/// Read, parse and validate a scenario file.
pub fn load_scenario(path: &Path) -> IoResult<Scenario> {
    let md = fs::metadata(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if md.len() > MAX_SCENARIO_BYTES {
        return Err(IoError::Invalid(format!(
            "{}: larger than {MAX_SCENARIO_BYTES} bytes",
            path.display()
        )));
    }
    let s = fs::read_to_string(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_scenario(&s)
}
