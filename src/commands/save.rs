use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::source::resolve_profile;
use crate::cli::SaveArgs;
use crate::report::ReportParser;
use crate::store::{SavedRun, SqliteSessionStore, load_run, save_run};
use crate::util::{now_utc_string, read_text_file, sha256_text, utc_compact_string};

pub fn run(args: SaveArgs) -> Result<()> {
    let report = read_text_file(&args.input)?;
    let profile = resolve_profile(&args.profile, Default::default())?;
    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| format!("run-{}", utc_compact_string(Utc::now())));

    let parser = ReportParser::new()?;
    let idea_count = parser.parse_top_ideas(&report, usize::MAX).len();
    if idea_count == 0 {
        warn!(path = %args.input.display(), "saved report has no recognizable idea headings");
    }

    let db_path = args.store.resolved_db_path();
    let mut store = SqliteSessionStore::open(&db_path)?;
    if load_run(&store, &run_id)?.is_some() {
        warn!(run_id = %run_id, "replacing existing saved run");
    }

    let saved = SavedRun {
        run_id: run_id.clone(),
        saved_at: now_utc_string(),
        source_path: Some(args.input.display().to_string()),
        report_sha256: sha256_text(&report),
        profile,
        report,
    };
    save_run(&mut store, &saved)?;

    info!(
        run_id = %run_id,
        idea_count,
        sha256 = %saved.report_sha256,
        path = %db_path.display(),
        "saved run"
    );
    println!("{run_id}");
    Ok(())
}
