use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::{ProfileArgs, ReportSourceArgs, StoreArgs};
use crate::model::ReportSourceInfo;
use crate::report::ProfileContext;
use crate::store::{SqliteSessionStore, load_run};
use crate::util::{read_text_file, sha256_text};

pub(crate) struct LoadedReport {
    pub markdown: String,
    pub info: ReportSourceInfo,
    pub profile: ProfileContext,
}

/// Reads the report from `--input` or from a saved run. A saved run also
/// carries the profile it was saved with.
pub(crate) fn load_report(source: &ReportSourceArgs, store: &StoreArgs) -> Result<LoadedReport> {
    if let Some(path) = &source.input {
        let markdown = read_text_file(path)?;
        info!(path = %path.display(), bytes = markdown.len(), "loaded report file");

        return Ok(LoadedReport {
            info: ReportSourceInfo {
                kind: "file",
                path: Some(path.display().to_string()),
                run_id: None,
                sha256: sha256_text(&markdown),
                bytes: markdown.len(),
            },
            markdown,
            profile: ProfileContext::default(),
        });
    }

    let Some(run_id) = &source.run_id else {
        bail!("no report given: pass --input <file> or --run-id <id>");
    };

    let db_path = store.resolved_db_path();
    if !db_path.exists() {
        bail!(
            "session store {} does not exist; save a run first",
            db_path.display()
        );
    }

    let session = SqliteSessionStore::open(&db_path)?;
    let Some(run) = load_run(&session, run_id)? else {
        bail!("saved run not found: {run_id}");
    };
    info!(run_id = %run.run_id, bytes = run.report.len(), "loaded saved run");

    Ok(LoadedReport {
        info: ReportSourceInfo {
            kind: "saved_run",
            path: run.source_path.clone(),
            run_id: Some(run.run_id.clone()),
            sha256: sha256_text(&run.report),
            bytes: run.report.len(),
        },
        markdown: run.report,
        profile: run.profile,
    })
}

/// Profile from `--profile-path`, then `saved`, then individual flags; later
/// sources win field by field.
pub(crate) fn resolve_profile(args: &ProfileArgs, saved: ProfileContext) -> Result<ProfileContext> {
    let mut profile = ProfileContext::default();

    if let Some(path) = &args.profile_path {
        let raw = read_text_file(path)?;
        let from_file = serde_json::from_str::<ProfileContext>(&raw)
            .with_context(|| format!("failed to parse profile {}", path.display()))?;
        profile.merge(from_file);
    }

    profile.merge(saved);
    profile.merge(args.overrides());
    Ok(profile)
}
