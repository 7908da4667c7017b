// crates/seat_cli/src/main.rs
//
// load → overrides → pipeline → result.json → optional reports.

#![forbid(unsafe_code)]

mod args;
mod logging;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const SPEC: i32 = 5;
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info};

use args::{parse_and_validate as parse_cli, Args, RenderFormat};

use seat_core::inputs::ElectionInputs;
use seat_core::variables::{PolicyTable, TiePolicy};
use seat_io::canonical_json::write_atomic;
use seat_io::manifest::{canonical_file_digest, load_verify_manifest, ManifestError};
use seat_io::presets::{group_styles_preset, load_group_styles, load_policy_table, GroupStyles};
use seat_io::scenario::{load_scenario, Scenario, DEFAULT_POLICY_PRESET};
use seat_io::IoError;
use seat_pipeline::{run, write_result, PipelineError, RunOptions, RunResult};
use seat_report::{build_model, render_json, render_text, ReportError, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Scenario / policy / manifest shape, unknown labels, digest mismatch.
    Validation(String),
    /// Read / write / path errors.
    Io(String),
    /// Allocation or report-building failure.
    Spec(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Spec(m) => write!(f, "{m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seatsim: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    logging::init_tracing(args.quiet);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            eprintln!("seatsim: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Spec(_) => SPEC,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Manifest(m) => map_manifest_err(m),
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Hash(m) => MainError::Validation(format!("hash: {m}")),
        IoError::UnknownPreset(m) => MainError::Validation(format!("unknown preset: {m}")),
        IoError::Invalid(m) => MainError::Validation(m),
    }
}

fn map_manifest_err(e: ManifestError) -> MainError {
    match e {
        ManifestError::Io(..) | ManifestError::NotAFile(..) => MainError::Io(format!("manifest: {e}")),
        other => MainError::Validation(format!("manifest: {other}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(m) => MainError::Io(m),
        PipelineError::Invalid(m) => MainError::Validation(m),
        other @ (PipelineError::Allocate { .. } | PipelineError::Build(_)) => {
            MainError::Spec(other.to_string())
        }
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Spec(format!("report: {e}"))
}

/// Every input of one run, resolved.
struct Loaded {
    scenario_path: PathBuf,
    scenario: Scenario,
    table: PolicyTable,
    styles: GroupStyles,
}

fn load_inputs(args: &Args) -> Result<Loaded, MainError> {
    let (scenario_path, man_policy, man_groups) = match (&args.manifest, &args.scenario) {
        (Some(m), _) => {
            let r = load_verify_manifest(m).map_err(map_manifest_err)?;
            (r.scenario_path, r.policy_path, r.groups_path)
        }
        (None, Some(s)) => (s.clone(), None, None),
        (None, None) => return Err(MainError::Validation("no scenario given".into())),
    };

    let scenario = load_scenario(&scenario_path).map_err(map_io_err)?;

    let table = match args.policy.as_ref().or(man_policy.as_ref()) {
        Some(p) => load_policy_table(p),
        None => scenario.policy_table(),
    }
    .map_err(map_io_err)?;

    let styles = match args.groups.as_ref().or(man_groups.as_ref()) {
        Some(p) => load_group_styles(p),
        None => group_styles_preset(
            scenario.policy_preset.as_deref().unwrap_or(DEFAULT_POLICY_PRESET),
        ),
    }
    .map_err(map_io_err)?;

    Ok(Loaded {
        scenario_path,
        scenario,
        table,
        styles,
    })
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let loaded = load_inputs(args)?;
    let overrides = args.overrides();
    overrides.check_against(&loaded.scenario).map_err(map_io_err)?;

    if args.validate_only {
        info!(
            scenario = %loaded.scenario_path.display(),
            constituencies = loaded.table.len(),
            seats = loaded.table.total_seats(),
            "inputs OK"
        );
        return Ok(());
    }

    let mut inputs = ElectionInputs::new(loaded.scenario.defaults());
    overrides.apply(&mut inputs);
    if inputs.has_overrides() {
        info!(
            shares = overrides.shares.len(),
            turnout = overrides.turnout.len(),
            voters = overrides.voters.len(),
            "overrides applied"
        );
    }

    let digest = canonical_file_digest(&loaded.scenario_path).map_err(map_manifest_err)?;
    let opts = RunOptions {
        tie_policy: args
            .tie_seed
            .map(|seed| TiePolicy::Random { seed })
            .unwrap_or_default(),
        input_sha256: Some(digest),
    };

    let result = run(
        &inputs.snapshot(),
        &loaded.table,
        &loaded.scenario.group_mapping(),
        &opts,
    )
    .map_err(map_pipeline_err)?;

    match &args.out {
        Some(dir) => write_outputs(dir, &result, &loaded.styles, &args.render),
        None => print_reports(&result, &loaded.styles, &args.render),
    }
}

fn write_outputs(
    dir: &Path,
    result: &RunResult,
    styles: &GroupStyles,
    formats: &[RenderFormat],
) -> Result<(), MainError> {
    fs::create_dir_all(dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", dir.display())))?;

    let res_path = dir.join("result.json");
    write_result(&res_path, result).map_err(map_pipeline_err)?;

    if !formats.is_empty() {
        let model = build_model(result, styles).map_err(map_report_err)?;
        for &f in formats {
            let path = dir.join(f.file_name());
            let body = render(f, &model)?;
            write_atomic(&path, body.as_bytes())
                .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
        }
    }

    info!(result_id = %result.id, out = %dir.display(), "artifacts written");
    Ok(())
}

fn print_reports(
    result: &RunResult,
    styles: &GroupStyles,
    formats: &[RenderFormat],
) -> Result<(), MainError> {
    let model = build_model(result, styles).map_err(map_report_err)?;
    let formats = if formats.is_empty() { &[RenderFormat::Text][..] } else { formats };

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    for &f in formats {
        let body = render(f, &model)?;
        lock.write_all(body.as_bytes())
            .map_err(|e| MainError::Io(format!("stdout: {e}")))?;
    }
    Ok(())
}

fn render(f: RenderFormat, model: &ReportModel) -> Result<String, MainError> {
    match f {
        RenderFormat::Json => render_json(model).map_err(map_report_err),
        RenderFormat::Text => Ok(render_text(model)),
    }
}
