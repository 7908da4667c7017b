//! seat_core: Core types, domains, and deterministic RNG.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`seat_algo`, `seat_io`, `seat_pipeline`, `seat_report`, `seat_cli`).
//!
//! - Labels: `PartyId`, `ConstituencyId`, `GroupLabel`
//! - Bounded numerics: `Fraction` (0..=1), `VoterCount` (>= 0)
//! - Domains: `Method`, `QuotaKind`, `TiePolicy`, `ConstituencyPolicy`
//! - Inputs: defaults + overrides → immutable `InputSnapshot`
//! - Seedable RNG (ChaCha20) for **ties only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    use crate::ids::IdError;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum CoreError {
        InvalidLabel(IdError),
        NotFinite(&'static str),
        DomainOutOfRange(&'static str),
        ZeroSeats,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidLabel(e) => write!(f, "invalid label: {e}"),
                CoreError::NotFinite(k) => write!(f, "value is not a finite number: {k}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::ZeroSeats => write!(f, "seat count must be at least 1"),
            }
        }
    }

    impl std::error::Error for CoreError {}

    impl From<IdError> for CoreError {
        fn from(e: IdError) -> Self {
            CoreError::InvalidLabel(e)
        }
    }
}

pub mod ids;
pub mod values;
pub mod variables;
pub mod inputs;
pub mod rng;

pub use errors::CoreError;
pub use ids::{ConstituencyId, GroupLabel, PartyId};
pub use values::{Fraction, VoterCount};
pub use inputs::{ElectionInputs, InputSnapshot};
pub use variables::{ConstituencyPolicy, Method, PolicyTable, QuotaKind, TiePolicy};
