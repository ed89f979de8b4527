use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::session::SessionStore;
use crate::report::ProfileContext;

pub const SAVED_RUN_PREFIX: &str = "run:";

/// A report kept for later parsing, together with the profile it was
/// generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRun {
    pub run_id: String,
    pub saved_at: String,
    pub source_path: Option<String>,
    pub report_sha256: String,
    #[serde(default)]
    pub profile: ProfileContext,
    pub report: String,
}

fn run_key(run_id: &str) -> Result<String> {
    let run_id = run_id.trim();
    if run_id.is_empty() {
        bail!("run id must not be empty");
    }
    if run_id.chars().any(char::is_whitespace) {
        bail!("run id must not contain whitespace: {run_id:?}");
    }
    Ok(format!("{SAVED_RUN_PREFIX}{run_id}"))
}

pub fn save_run<S: SessionStore + ?Sized>(store: &mut S, run: &SavedRun) -> Result<()> {
    let key = run_key(&run.run_id)?;
    let value = serde_json::to_string(run)
        .with_context(|| format!("failed to serialize saved run {}", run.run_id))?;
    store.set(&key, &value)
}

pub fn load_run<S: SessionStore + ?Sized>(store: &S, run_id: &str) -> Result<Option<SavedRun>> {
    let key = run_key(run_id)?;
    let Some(raw) = store.get(&key)? else {
        return Ok(None);
    };

    let run = serde_json::from_str::<SavedRun>(&raw)
        .with_context(|| format!("failed to parse saved run {run_id}"))?;
    Ok(Some(run))
}

/// Saved runs ordered by run id.
pub fn list_runs<S: SessionStore + ?Sized>(store: &S) -> Result<Vec<SavedRun>> {
    let mut runs = Vec::<SavedRun>::new();
    for key in store.keys_with_prefix(SAVED_RUN_PREFIX)? {
        let Some(raw) = store.get(&key)? else {
            continue;
        };
        let run = serde_json::from_str::<SavedRun>(&raw)
            .with_context(|| format!("failed to parse saved run entry {key}"))?;
        runs.push(run);
    }

    Ok(runs)
}

pub fn delete_run<S: SessionStore + ?Sized>(store: &mut S, run_id: &str) -> Result<bool> {
    let key = run_key(run_id)?;
    store.clear(&key)
}

pub fn clear_runs<S: SessionStore + ?Sized>(store: &mut S) -> Result<usize> {
    let mut removed = 0usize;
    for key in store.keys_with_prefix(SAVED_RUN_PREFIX)? {
        if store.clear(&key)? {
            removed += 1;
        }
    }

    Ok(removed)
}
