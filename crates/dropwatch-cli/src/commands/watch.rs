use super::common::live_orchestrator;
use crate::{print_error, print_info, print_success, render};
use dropwatch_core::SnapshotConfig;
use dropwatch_network::SnapshotCells;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const HINT: &str = "Enter = refresh, q = quit";

/// Interactive mode: fetch on startup, re-render on every settled cell.
///
/// Refreshes run as detached tasks so a new one can start while an older one
/// is still in flight; the store drops whatever the older one settles late.
pub async fn handle(config: &SnapshotConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = Arc::new(live_orchestrator(config)?);
    let mut rx = orchestrator.store().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // closed stdin only ends manual refreshes; rendering continues until Ctrl-C
    let mut stdin_open = true;

    spawn_refresh(&orchestrator);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let cells = rx.borrow_and_update().clone();
                draw(&cells, config, json)?;
            }
            line = lines.next_line(), if stdin_open => {
                match next_input(line?.as_deref()) {
                    Input::Refresh => spawn_refresh(&orchestrator),
                    Input::Quit => break,
                    Input::Closed => {
                        debug!("stdin closed; manual refresh disabled");
                        stdin_open = false;
                    }
                    Input::Unknown(other) => {
                        if !json {
                            print_error(&format!("Unknown input '{}' ({})", other, HINT));
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if !json {
        print_success("Bye");
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Input<'a> {
    Refresh,
    Quit,
    Closed,
    Unknown(&'a str),
}

fn next_input(line: Option<&str>) -> Input<'_> {
    match line.map(str::trim) {
        None => Input::Closed,
        Some("") => Input::Refresh,
        Some("q") | Some("quit") => Input::Quit,
        Some(other) => Input::Unknown(other),
    }
}

fn spawn_refresh(orchestrator: &Arc<super::common::LiveOrchestrator>) {
    let orchestrator = Arc::clone(orchestrator);
    tokio::spawn(async move {
        let outcome = orchestrator.refresh().await;
        debug!(?outcome, "watch refresh finished");
    });
}

fn draw(
    cells: &SnapshotCells,
    config: &SnapshotConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        // one object per line so consumers can stream it
        println!(
            "{}",
            serde_json::to_string(&render::json_report(cells, config))?
        );
        return Ok(());
    }

    print!("{}", CLEAR_SCREEN);
    println!("{}", render::report(cells, config));
    println!();
    print_info(HINT);
    Ok(())
}
