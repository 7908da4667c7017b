// crates/seat_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
//
// - No networked paths (reject any scheme:// like http/https/file)
// - Exactly one of: SCENARIO  XOR  --manifest
// - Optional overrides of the policy table and the group display table
// - Slider equivalents: --share / --turnout / --voters (repeatable)
// - Seed for random tie-breaking: u64 decimal or 0x-hex up to 16 nybbles

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use seat_io::overrides::{Overrides, PartyShareOverride, TurnoutOverride, VotersOverride};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    Json,
    Text,
}

impl RenderFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            RenderFormat::Json => "report.json",
            RenderFormat::Text => "report.txt",
        }
    }
}

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "seatsim",
    version,
    disable_help_subcommand = true,
    about = "Offline, deterministic seat apportionment for multi-constituency elections"
)]
pub struct Args {
    /// Scenario JSON (mutually exclusive with --manifest).
    #[arg(conflicts_with = "manifest")]
    pub scenario: Option<PathBuf>,

    /// Manifest JSON naming the scenario and optional policy / groups files.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Policy table JSON; overrides the scenario's policy.
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Group display table JSON (category + color per group).
    #[arg(long)]
    pub groups: Option<PathBuf>,

    /// Vote share override, e.g. "AT EPP@Austria=25.5%". Repeatable.
    #[arg(long = "share", value_name = "PARTY@CONSTITUENCY=SHARE", value_parser = parse_share)]
    pub shares: Vec<PartyShareOverride>,

    /// Turnout override, e.g. "Malta=70%". Repeatable.
    #[arg(long, value_name = "CONSTITUENCY=SHARE", value_parser = parse_turnout)]
    pub turnout: Vec<TurnoutOverride>,

    /// Eligible voters override, e.g. "Malta=370000". Repeatable.
    #[arg(long, value_name = "CONSTITUENCY=COUNT", value_parser = parse_voters)]
    pub voters: Vec<VotersOverride>,

    /// Break exact ties with a seeded draw instead of party order.
    /// Accepts decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub tie_seed: Option<u64>,

    /// Output directory for result.json and reports. Without it the report
    /// goes to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Report format(s). Defaults to text on stdout.
    #[arg(long, value_enum)]
    pub render: Vec<RenderFormat>,

    /// Load and check inputs only; do not allocate.
    #[arg(long)]
    pub validate_only: bool,

    /// Log warnings and errors only.
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            shares: self.shares.clone(),
            turnout: self.turnout.clone(),
            voters: self.voters.clone(),
        }
    }
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required input: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
        }
    }
}

impl std::error::Error for CliError {}

fn parse_share(s: &str) -> Result<PartyShareOverride, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_turnout(s: &str) -> Result<TurnoutOverride, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_voters(s: &str) -> Result<VotersOverride, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>()
            .map_err(|_| "decimal seed must be a valid u64".into())
    }
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://")
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        args.scenario.as_deref(),
        args.manifest.as_deref(),
        args.policy.as_deref(),
        args.groups.as_deref(),
        args.out.as_deref(),
    ]
    .into_iter()
    .flatten()
}

/// Mode and path checks after clap has parsed the flags. File existence is
/// left to the loaders so a missing file reports as an I/O error.
pub fn validate(args: &Args) -> Result<(), CliError> {
    for p in iter_all_paths(args) {
        ensure_local_path(p)?;
    }
    if args.scenario.is_none() && args.manifest.is_none() {
        return Err(CliError::Missing("SCENARIO or --manifest"));
    }
    Ok(())
}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    validate(&args)?;
    Ok(args)
}
