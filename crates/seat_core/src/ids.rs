//! crates/seat_core/src/ids.rs
//! Label newtypes for parties, constituencies, and political groups.
//!
//! Labels are display strings taken from the source data ("CDU/CSU",
//! "Czech Republic", "S&D"), so spaces and punctuation are allowed. The shape
//! rules are: non-empty, no surrounding whitespace, no control characters,
//! at most 128 chars. Ordering is byte-lexicographic and is the canonical
//! order used by every tie-break in the engine.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

/// Errors returned when validating or parsing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    Untrimmed,
    ControlChar,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => f.write_str("label is empty"),
            IdError::TooLong => write!(f, "label exceeds {MAX_LABEL_LEN} chars"),
            IdError::Untrimmed => f.write_str("label has leading or trailing whitespace"),
            IdError::ControlChar => f.write_str("label contains a control character"),
        }
    }
}

impl std::error::Error for IdError {}

const MAX_LABEL_LEN: usize = 128;

/// Reserved group label: minor parties as named in the source data.
pub const MINOR_PARTIES_LABEL: &str = "Other parties";
/// Reserved group label: canonical catch-all bucket after aggregation.
pub const CATCH_ALL_GROUP: &str = "Others";
/// Reserved group label: parties with no entry in the group mapping.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Shape check shared by all label newtypes.
pub fn check_label(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.chars().count() > MAX_LABEL_LEN {
        return Err(IdError::TooLong);
    }
    if s.trim() != s {
        return Err(IdError::Untrimmed);
    }
    if s.chars().any(char::is_control) {
        return Err(IdError::ControlChar);
    }
    Ok(())
}

macro_rules! label_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap.
            pub fn new(s: impl Into<String>) -> Result<Self, IdError> {
                let s = s.into();
                check_label(&s)?;
                Ok(Self(s))
            }

            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl AsRef<str> for $name {
            #[inline] fn as_ref(&self) -> &str { &self.0 }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                $name::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

label_newtype!(
    /// Party label as it appears in the source data.
    PartyId
);
label_newtype!(
    /// Electoral constituency (member state or sub-national district).
    ConstituencyId
);
label_newtype!(
    /// Political group label used for cross-constituency aggregation.
    GroupLabel
);

impl GroupLabel {
    /// The canonical catch-all bucket ("Others").
    pub fn catch_all() -> Self {
        GroupLabel(CATCH_ALL_GROUP.to_string())
    }

    /// Explicit bucket for parties missing from the group mapping.
    pub fn unknown() -> Self {
        GroupLabel(UNKNOWN_GROUP.to_string())
    }

    /// True for the source data's minor-party label, which is renamed to the
    /// catch-all after allocation.
    pub fn is_minor_parties(&self) -> bool {
        self.0 == MINOR_PARTIES_LABEL
    }
}
