// crates/seat_io/src/manifest.rs
//
// A manifest names the files of one run: a scenario plus optional policy
// and group-style tables that override the scenario's preset.
//
// • Offline-only: any path with a scheme ("://", "http:", "https:") is rejected.
// • Paths resolve relative to the manifest's directory.
// • Digests (if provided) are lowercase 64-hex over canonical JSON bytes and
//   may only name inputs that are present.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical_json::to_canonical_json_bytes;
use crate::hasher::{is_lower_hex_64, sha256_hex};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Optional, informational only.
    #[serde(default)]
    pub id: Option<String>,
    pub scenario_path: String,
    #[serde(default)]
    pub policy_path: Option<String>,
    #[serde(default)]
    pub groups_path: Option<String>,
    #[serde(default)]
    pub inputs_sha256: Option<InputDigests>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDigests {
    #[serde(default)]
    pub scenario_path: Option<String>,
    #[serde(default)]
    pub policy_path: Option<String>,
    #[serde(default)]
    pub groups_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    pub scenario_path: PathBuf,
    pub policy_path: Option<PathBuf>,
    pub groups_path: Option<PathBuf>,
    pub digests: Option<InputDigests>,
}

#[derive(Debug)]
pub enum ManifestError {
    Empty(&'static str),
    UrlPath(&'static str, String),
    Io(&'static str, String),
    NotAFile(&'static str, String),
    DigestShape(&'static str, String),
    DigestMismatch(&'static str, String),
    DigestForMissing(&'static str),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ManifestError::*;
        match self {
            Empty(k) => write!(f, "field must not be empty: {k}"),
            UrlPath(k, v) => write!(f, "path must be offline (no scheme) for {k}: {v}"),
            Io(k, v) => write!(f, "cannot access {k}: {v}"),
            NotAFile(k, v) => write!(f, "path is not a file for {k}: {v}"),
            DigestShape(k, v) => write!(f, "invalid sha256 format for {k}: {v}"),
            DigestMismatch(k, v) => write!(f, "sha256 mismatch for {k}: {v}"),
            DigestForMissing(k) => write!(f, "digest supplied for missing input: {k}"),
        }
    }
}

impl std::error::Error for ManifestError {}

// ---------- helpers ----------

#[inline]
fn has_any_scheme(s: &str) -> bool {
    s.contains("://") || s.starts_with("http:") || s.starts_with("https:")
}

#[inline]
fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn check_path(label: &'static str, path: &str) -> Result<(), ManifestError> {
    if path.trim().is_empty() {
        return Err(ManifestError::Empty(label));
    }
    if has_any_scheme(path) {
        return Err(ManifestError::UrlPath(label, path.to_string()));
    }
    Ok(())
}

fn check_digest(
    label: &'static str,
    digest: Option<&String>,
    present: bool,
) -> Result<(), ManifestError> {
    let Some(h) = digest else { return Ok(()) };
    if !present {
        return Err(ManifestError::DigestForMissing(label));
    }
    if !is_lower_hex_64(h) {
        return Err(ManifestError::DigestShape(label, h.clone()));
    }
    Ok(())
}

// ---------- validation (no I/O) ----------

pub fn validate_manifest(man: &Manifest) -> Result<(), ManifestError> {
    check_path("scenario_path", &man.scenario_path)?;
    if let Some(p) = &man.policy_path {
        check_path("policy_path", p)?;
    }
    if let Some(p) = &man.groups_path {
        check_path("groups_path", p)?;
    }
    if let Some(d) = &man.inputs_sha256 {
        check_digest("scenario_path", d.scenario_path.as_ref(), true)?;
        check_digest("policy_path", d.policy_path.as_ref(), man.policy_path.is_some())?;
        check_digest("groups_path", d.groups_path.as_ref(), man.groups_path.is_some())?;
    }
    Ok(())
}

// ---------- resolution ----------

/// Join every path under `base_dir` and check that each names a file.
pub fn resolve_paths(base_dir: &Path, man: &Manifest) -> Result<ResolvedManifest, ManifestError> {
    let scenario = join_under(base_dir, &man.scenario_path);
    let policy = man.policy_path.as_ref().map(|s| join_under(base_dir, s));
    let groups = man.groups_path.as_ref().map(|s| join_under(base_dir, s));

    must_exist_file("scenario_path", &scenario)?;
    if let Some(p) = &policy {
        must_exist_file("policy_path", p)?;
    }
    if let Some(p) = &groups {
        must_exist_file("groups_path", p)?;
    }

    Ok(ResolvedManifest {
        scenario_path: scenario,
        policy_path: policy,
        groups_path: groups,
        digests: man.inputs_sha256.clone(),
    })
}

fn must_exist_file(label: &'static str, p: &Path) -> Result<(), ManifestError> {
    let md = fs::metadata(p).map_err(|e| ManifestError::Io(label, format!("{} ({e})", p.display())))?;
    if !md.is_file() {
        return Err(ManifestError::NotAFile(label, p.display().to_string()));
    }
    Ok(())
}

// ---------- digests ----------

/// SHA-256 of a JSON file's canonical form.
pub fn canonical_file_digest(p: &Path) -> Result<String, ManifestError> {
    let buf = fs::read(p).map_err(|e| ManifestError::Io("read", format!("{} ({e})", p.display())))?;
    let v: Value = serde_json::from_slice(&buf)
        .map_err(|e| ManifestError::Io("parse", format!("{} ({e})", p.display())))?;
    let canon = to_canonical_json_bytes(&v)
        .map_err(|e| ManifestError::Io("canonicalize", e.to_string()))?;
    Ok(sha256_hex(&canon))
}

/// Verify every supplied digest. `Ok(())` when none were supplied.
pub fn verify_digests(resolved: &ResolvedManifest) -> Result<(), ManifestError> {
    let Some(d) = &resolved.digests else { return Ok(()) };

    fn check_one(path: &Path, expect: &str, label: &'static str) -> Result<(), ManifestError> {
        let got = canonical_file_digest(path)?;
        if got != expect {
            return Err(ManifestError::DigestMismatch(
                label,
                format!("expected={expect} got={got}"),
            ));
        }
        Ok(())
    }

    if let Some(hex) = &d.scenario_path {
        check_one(&resolved.scenario_path, hex, "scenario_path")?;
    }
    match (&resolved.policy_path, &d.policy_path) {
        (Some(p), Some(hex)) => check_one(p, hex, "policy_path")?,
        (None, Some(_)) => return Err(ManifestError::DigestForMissing("policy_path")),
        _ => {}
    }
    match (&resolved.groups_path, &d.groups_path) {
        (Some(p), Some(hex)) => check_one(p, hex, "groups_path")?,
        (None, Some(_)) => return Err(ManifestError::DigestForMissing("groups_path")),
        _ => {}
    }
    Ok(())
}

// ---------- top-level ----------

const MAX_MANIFEST_BYTES: u64 = 4 * 1024 * 1024;

/// Load, validate and resolve a manifest (no digest checks).
pub fn load_and_resolve_manifest(manifest_path: &Path) -> Result<ResolvedManifest, ManifestError> {
    let f = fs::File::open(manifest_path)
        .map_err(|e| ManifestError::Io("read", format!("{} ({e})", manifest_path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_MANIFEST_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ManifestError::Io("read", format!("{} ({e})", manifest_path.display())))?;

    let man: Manifest = serde_json::from_slice(&buf)
        .map_err(|e| ManifestError::Io("parse", format!("{} ({e})", manifest_path.display())))?;
    validate_manifest(&man)?;

    let base = manifest_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    resolve_paths(&base, &man)
}

/// Load + resolve + verify digests.
pub fn load_verify_manifest(manifest_path: &Path) -> Result<ResolvedManifest, ManifestError> {
    let resolved = load_and_resolve_manifest(manifest_path)?;
    verify_digests(&resolved)?;
    Ok(resolved)
}
