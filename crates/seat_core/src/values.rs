//! Bounded numeric newtypes.
//!
//! Vote shares, turnout, and thresholds are carried as `Fraction` (0..=1)
//! from the I/O boundary inward; percent strings never reach the engine.
//! Eligible-voter counts are real-valued (source data holds population
//! estimates, not integers) and must be finite and non-negative.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// A finite real in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Fraction(f64);

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const ONE: Fraction = Fraction(1.0);

    pub fn new(v: f64) -> Result<Self, CoreError> {
        if !v.is_finite() {
            return Err(CoreError::NotFinite("fraction"));
        }
        if !(0.0..=1.0).contains(&v) {
            return Err(CoreError::DomainOutOfRange("fraction must be within 0..=1"));
        }
        Ok(Self(v))
    }

    /// `12.5` → `0.125`.
    pub fn from_percent(pct: f64) -> Result<Self, CoreError> {
        if !pct.is_finite() {
            return Err(CoreError::NotFinite("percent"));
        }
        Self::new(pct / 100.0)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn as_percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::ZERO
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(d)?;
        Fraction::new(v).map_err(serde::de::Error::custom)
    }
}

/// Eligible voters in a constituency (finite, `>= 0`).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VoterCount(f64);

impl VoterCount {
    pub fn new(v: f64) -> Result<Self, CoreError> {
        if !v.is_finite() {
            return Err(CoreError::NotFinite("voter count"));
        }
        if v < 0.0 {
            return Err(CoreError::DomainOutOfRange("voter count must be >= 0"));
        }
        Ok(Self(v))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for VoterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for VoterCount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(d)?;
        VoterCount::new(v).map_err(serde::de::Error::custom)
    }
}
