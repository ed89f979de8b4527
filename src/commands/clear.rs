use anyhow::{Result, bail};
use tracing::info;

use crate::cli::ClearArgs;
use crate::store::{SqliteSessionStore, clear_runs, delete_run};

pub fn run(args: ClearArgs) -> Result<()> {
    let db_path = args.store.resolved_db_path();
    if !db_path.exists() {
        info!(path = %db_path.display(), "session store missing, nothing to clear");
        return Ok(());
    }

    let mut store = SqliteSessionStore::open(&db_path)?;

    if args.all {
        let removed = clear_runs(&mut store)?;
        info!(removed, "cleared saved runs");
        return Ok(());
    }

    let Some(run_id) = &args.run_id else {
        bail!("pass --run-id <id> or --all");
    };
    if !delete_run(&mut store, run_id)? {
        bail!("saved run not found: {run_id}");
    }

    info!(run_id = %run_id, "deleted saved run");
    Ok(())
}
