// Small dev utility: print the event log of a saved simulation run.
//
// Usage:
//   cargo run --bin show_run -- [db_path] [run_id]
//
// Without run_id the most recent timeline run is shown.

use container_yard_aps::db::{default_db_path, open_sqlite_connection};
use container_yard_aps::SimulationRepository;
use std::sync::{Arc, Mutex};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(default_db_path);

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));
    let repo = SimulationRepository::new(conn);
    repo.ensure_schema()?;

    let run_id = match args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        Some(id) => id,
        None => repo
            .list_runs()?
            .into_iter()
            .find(|r| r.mode == "timeline")
            .map(|r| r.run_id)
            .ok_or_else(|| anyhow::anyhow!("No timeline run found (pass run_id explicitly)"))?,
    };

    for event in repo.list_events(&run_id)? {
        println!("{} {}", event.date, event.description);
    }

    let dates = repo.list_snapshot_dates(&run_id)?;
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        println!("snapshots: {} .. {} ({} days)", first, last, dates.len());
    }
    Ok(())
}
