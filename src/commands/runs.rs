use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::RunsArgs;
use crate::model::RunSummary;
use crate::report::ReportParser;
use crate::store::{SqliteSessionStore, list_runs};

pub fn run(args: RunsArgs) -> Result<()> {
    let db_path = args.store.resolved_db_path();
    let summaries = if db_path.exists() {
        let store = SqliteSessionStore::open(&db_path)?;
        let parser = ReportParser::new()?;

        list_runs(&store)?
            .into_iter()
            .map(|run| RunSummary {
                idea_count: parser.parse_top_ideas(&run.report, usize::MAX).len(),
                run_id: run.run_id,
                saved_at: run.saved_at,
                source_path: run.source_path,
                report_sha256: run.report_sha256,
            })
            .collect::<Vec<RunSummary>>()
    } else {
        Vec::new()
    };

    info!(path = %db_path.display(), runs = summaries.len(), "listed saved runs");

    let mut out = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &summaries)
            .context("failed to serialize saved run list")?;
        writeln!(out)?;
    } else {
        writeln!(out, "Saved runs: {}", summaries.len())?;
        for summary in &summaries {
            writeln!(
                out,
                "{}\tsaved_at={}\tsha256={}\tideas={}",
                summary.run_id, summary.saved_at, summary.report_sha256, summary.idea_count
            )?;
        }
    }
    out.flush()?;

    Ok(())
}
