//! variables.rs: apportionment domains and the per-constituency policy table.
//!
//! The policy table is the only tunable surface for jurisdiction rules:
//! adding or amending a constituency is a data change, not a code change.
//!
//! Wire shape of one rule (serde):
//! `{"constituency":"Bulgaria","method":"largest_remainder","quota":"hare","seats":17,"threshold":0.059}`

use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::ConstituencyId;
use crate::values::Fraction;

/// Quota used by the largest-remainder family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuotaKind {
    /// `V / m`
    #[default]
    Hare,
    /// `floor(V / (m + 1)) + 1`
    Droop,
    /// `V / (m + 2)`
    Imperiali,
}

impl QuotaKind {
    /// Votes-per-seat denominator for `total` votes and `seats` seats.
    pub fn quota(self, total: f64, seats: u32) -> f64 {
        let m = f64::from(seats);
        match self {
            QuotaKind::Hare => {
                if seats == 0 { 0.0 } else { total / m }
            }
            QuotaKind::Droop => (total / (m + 1.0)).floor() + 1.0,
            QuotaKind::Imperiali => total / (m + 2.0),
        }
    }
}

impl fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuotaKind::Hare => "Hare",
            QuotaKind::Droop => "Droop",
            QuotaKind::Imperiali => "Imperiali",
        })
    }
}

/// Apportionment method. The quota travels only with the largest-remainder
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "method"))]
pub enum Method {
    #[cfg_attr(feature = "serde", serde(rename = "dhondt"))]
    DHondt,
    #[cfg_attr(feature = "serde", serde(rename = "sainte_lague"))]
    SainteLague,
    /// First divisor 1.4, then 3, 5, 7, …
    #[cfg_attr(feature = "serde", serde(rename = "modified_sainte_lague"))]
    ModifiedSainteLague,
    #[cfg_attr(feature = "serde", serde(rename = "largest_remainder"))]
    LargestRemainder {
        #[cfg_attr(feature = "serde", serde(default))]
        quota: QuotaKind,
    },
}

impl Method {
    /// Stable machine token (matches the serde tag).
    pub fn token(&self) -> &'static str {
        match self {
            Method::DHondt => "dhondt",
            Method::SainteLague => "sainte_lague",
            Method::ModifiedSainteLague => "modified_sainte_lague",
            Method::LargestRemainder { .. } => "largest_remainder",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::DHondt => f.write_str("D'Hondt"),
            Method::SainteLague => f.write_str("Sainte-Laguë"),
            Method::ModifiedSainteLague => f.write_str("modified Sainte-Laguë"),
            Method::LargestRemainder { quota } => write!(f, "largest remainder ({quota} quota)"),
        }
    }
}

/// How exact ties (equal quotients / equal remainders) are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "policy", rename_all = "snake_case"))]
pub enum TiePolicy {
    /// Smallest `PartyId` (byte-lexicographic) wins.
    #[default]
    Lexicographic,
    /// Seeded ChaCha20 draw among the tied parties; reproducible per seed.
    Random { seed: u64 },
}

/// Electoral rule for one constituency.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstituencyPolicy {
    pub constituency: ConstituencyId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub method: Method,
    pub seats: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub threshold: Fraction,
}

impl ConstituencyPolicy {
    /// `seats >= 1`, `threshold < 1`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.seats == 0 {
            return Err(CoreError::ZeroSeats);
        }
        if self.threshold.get() >= 1.0 {
            return Err(CoreError::DomainOutOfRange("threshold must be below 1"));
        }
        Ok(())
    }
}

/// Policy table construction errors.
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyTableError {
    Invalid { constituency: ConstituencyId, error: CoreError },
    Duplicate(ConstituencyId),
}

impl fmt::Display for PolicyTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyTableError::Invalid { constituency, error } => {
                write!(f, "invalid rule for {constituency}: {error}")
            }
            PolicyTableError::Duplicate(c) => write!(f, "duplicate rule for {c}"),
        }
    }
}

impl std::error::Error for PolicyTableError {}

/// Validated constituency → rule table, iterated in `ConstituencyId` order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<ConstituencyPolicy>", into = "Vec<ConstituencyPolicy>")
)]
pub struct PolicyTable {
    rules: BTreeMap<ConstituencyId, ConstituencyPolicy>,
}

impl PolicyTable {
    pub fn from_rules<I>(rules: I) -> Result<Self, PolicyTableError>
    where
        I: IntoIterator<Item = ConstituencyPolicy>,
    {
        let mut map = BTreeMap::new();
        for rule in rules {
            rule.validate().map_err(|error| PolicyTableError::Invalid {
                constituency: rule.constituency.clone(),
                error,
            })?;
            if map.contains_key(&rule.constituency) {
                return Err(PolicyTableError::Duplicate(rule.constituency));
            }
            map.insert(rule.constituency.clone(), rule);
        }
        Ok(Self { rules: map })
    }

    pub fn get(&self, c: &ConstituencyId) -> Option<&ConstituencyPolicy> {
        self.rules.get(c)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstituencyPolicy> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Σ configured seats over every rule.
    pub fn total_seats(&self) -> u64 {
        self.rules.values().map(|r| u64::from(r.seats)).sum()
    }
}

impl TryFrom<Vec<ConstituencyPolicy>> for PolicyTable {
    type Error = PolicyTableError;
    fn try_from(v: Vec<ConstituencyPolicy>) -> Result<Self, Self::Error> {
        PolicyTable::from_rules(v)
    }
}

impl From<PolicyTable> for Vec<ConstituencyPolicy> {
    fn from(t: PolicyTable) -> Self {
        t.rules.into_values().collect()
    }
}
