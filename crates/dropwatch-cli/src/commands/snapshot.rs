use super::common::live_orchestrator;
use crate::{print_error, print_info, print_success, render};
use dropwatch_core::SnapshotConfig;

/// One-shot: fetch on startup, print, exit. Partial failures are reported
/// in the output, not through the exit code.
pub async fn handle(config: &SnapshotConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = live_orchestrator(config)?;

    if !json {
        print_info(&format!(
            "Fetching balances from {} and {}...",
            config.origin.name, config.destination.name
        ));
    }

    let outcome = orchestrator.refresh().await;
    let cells = orchestrator.store().current();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&render::json_report(&cells, config))?
        );
        return Ok(());
    }

    println!();
    println!("{}", render::report(&cells, config));
    println!();

    let failures = cells.failures();
    if failures.is_empty() {
        print_success(&format!("Snapshot #{} complete", outcome.generation));
    } else {
        for (label, message) in failures {
            print_error(&format!("{}: {}", label, message));
        }
    }

    Ok(())
}
