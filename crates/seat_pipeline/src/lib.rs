//! seat_pipeline: snapshot → project → threshold → allocate → aggregate → result.
//!
//! I/O-free apart from `write_result`; JSON canonicalization and hashing are
//! delegated to `seat_io`, the arithmetic to `seat_algo`.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use seat_algo::{project_all, AllocError};
use seat_core::ids::{ConstituencyId, GroupLabel, PartyId};
use seat_core::inputs::InputSnapshot;
use seat_core::variables::{PolicyTable, TiePolicy};
use seat_io::{canonical_json, hasher, IoError};

pub mod aggregate;
pub mod allocate;
pub mod diagnostics;

pub use aggregate::{aggregate, seats_by_constituency, AggregatedSeats, Aggregation, GroupedRow};
pub use allocate::{allocate_all, AllocationRun, ConstituencyOutcome, SeatRow, TieRecord};
pub use diagnostics::{Diagnostic, Diagnostics, NoVotesReason};

/// Single error surface for a run. Data problems inside a constituency are
/// diagnostics, not errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io: {0}")]
    Io(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("allocation failed in {constituency}: {source}")]
    Allocate {
        constituency: ConstituencyId,
        source: AllocError,
    },
    #[error("build: {0}")]
    Build(String),
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        use PipelineError::*;
        match e {
            IoError::Path(m) => Io(format!("path: {m}")),
            IoError::Json { pointer, msg } => Invalid(format!("json {pointer}: {msg}")),
            IoError::Hash(m) => Build(format!("hash: {m}")),
            IoError::Manifest(m) => Invalid(format!("manifest: {m}")),
            IoError::UnknownPreset(m) => Invalid(format!("unknown preset: {m}")),
            IoError::Invalid(m) => Invalid(m),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub tie_policy: TiePolicy,
    /// Digest of the scenario file, echoed into the result.
    pub input_sha256: Option<String>,
}

/// Projected votes for one cell; `None` is a data gap.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VoteRow {
    pub party: PartyId,
    pub constituency: ConstituencyId,
    pub votes: Option<f64>,
}

/// Everything the result ID is computed over.
#[derive(Clone, Debug, Serialize)]
pub struct ResultBody {
    pub tie_policy: TiePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
    pub votes: Vec<VoteRow>,
    pub seats: Vec<GroupedRow>,
    pub constituencies: Vec<ConstituencyOutcome>,
    pub groups: AggregatedSeats,
    pub seats_by_constituency: BTreeMap<ConstituencyId, u64>,
    pub ties: Vec<TieRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub total_seats: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunResult {
    /// `RES:<hex64>` over the canonical body.
    pub id: String,
    #[serde(flatten)]
    pub body: ResultBody,
}

impl RunResult {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.body.diagnostics
    }

    pub fn groups(&self) -> &AggregatedSeats {
        &self.body.groups
    }

    pub fn total_seats(&self) -> u64 {
        self.body.total_seats
    }
}

/// Run one snapshot end to end.
///
/// Identical snapshot, table, mapping and options yield an identical result
/// and result ID.
pub fn run(
    snapshot: &InputSnapshot,
    table: &PolicyTable,
    mapping: &BTreeMap<PartyId, GroupLabel>,
    opts: &RunOptions,
) -> Result<RunResult, PipelineError> {
    let projected = project_all(snapshot);
    let votes = projected
        .rows()
        .map(|(c, p, v)| VoteRow {
            party: p.clone(),
            constituency: c.clone(),
            votes: v,
        })
        .collect();

    let alloc = allocate_all(&projected, table, opts.tie_policy)?;
    let agg = aggregate(&alloc.rows, mapping);

    let mut diagnostics = alloc.diagnostics;
    diagnostics.extend(agg.diagnostics);

    let total_seats = agg.groups.total_seats();
    let body = ResultBody {
        tie_policy: opts.tie_policy,
        input_sha256: opts.input_sha256.clone(),
        votes,
        seats: agg.rows,
        constituencies: alloc.outcomes,
        groups: agg.groups,
        seats_by_constituency: agg.by_constituency,
        ties: alloc.ties,
        diagnostics: diagnostics.into_vec(),
        total_seats,
    };
    let id = hasher::res_id_from_canonical(&body)?;

    info!(
        result_id = %id,
        constituencies = body.constituencies.len(),
        total_seats,
        diagnostics = body.diagnostics.len(),
        "run complete"
    );
    Ok(RunResult { id, body })
}

/// Write the result as canonical JSON.
pub fn write_result(path: &Path, result: &RunResult) -> Result<(), PipelineError> {
    canonical_json::write_canonical_file(path, result)?;
    Ok(())
}
