//! crates/seat_io/src/lib.rs
//! Offline I/O for the seat engine.
//!
//! - Scenario files (JSON) → typed defaults for an `ElectionInputs`.
//! - Policy tables and group display tables, from files or built-in presets.
//! - `"12.5%"` strings are parsed here and nowhere else.
//! - Canonical JSON + SHA-256 for content-derived IDs.
//! - Manifests tying the above together, offline-only.
//! - Slider-equivalent overrides parsed from `KEY=VALUE` strings.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for seat_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON parse / serialize errors, with a location hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Hashing-related errors (read failures, bad digests).
    #[error("hash error: {0}")]
    Hash(String),

    /// Manifest shape / offline policy / digest mismatch.
    #[error("manifest error: {0}")]
    Manifest(#[from] manifest::ManifestError),

    /// Unknown built-in preset name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// Domain validation (duplicate ids, out-of-range values, …).
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json reports line/column, not a pointer.
        IoError::Json {
            pointer: format!("line {} column {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod manifest;
pub mod overrides;
pub mod percent;
pub mod presets;
pub mod scenario;

pub mod prelude {
    pub use crate::{IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{res_id_from_canonical, sha256_canonical, sha256_hex};
    pub use crate::manifest::{load_verify_manifest, ResolvedManifest};
    pub use crate::overrides::Overrides;
    pub use crate::percent::parse_percent;
    pub use crate::presets::{GroupStyle, GroupStyles};
    pub use crate::scenario::{load_scenario, Scenario};
}
