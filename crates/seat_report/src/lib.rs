//! seat_report: pure offline report model + renderers (JSON / plain text).
//!
//! - No I/O. Callers pass the run result and the group display table.
//! - Groups and chart slices are ordered by display category, descending.
//! - The chart closes with a filler slice equal to the visible total.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod structure;

#[cfg(feature = "render_json")]
pub mod render_json;
#[cfg(feature = "render_text")]
pub mod render_text;

pub use structure::{
    build_model, ChartSlice, ConstituencyLine, GroupLine, ReportModel, SeatLine, VoteLine,
};

#[cfg(feature = "render_json")]
pub use render_json::render_json;
#[cfg(feature = "render_text")]
pub use render_text::render_text;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Nothing was allocated, so there is no chart to draw.
    #[error("total seats is zero; nothing to report")]
    ZeroTotalSeats,
    #[error("serialize: {0}")]
    Serialize(String),
}
