// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DROPWATCH CLI - Airdrop Distribution Snapshot Viewer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "dropwatch")]
#[command(about = "Dropwatch - Airdrop Distribution Snapshot", long_about = None)]
#[command(version)]
struct Cli {
    /// Replacement configuration file (reads DROPWATCH_CONFIG env var,
    /// or uses the configuration built into the binary)
    #[arg(short, long, env = "DROPWATCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of the coloured report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every balance and the spot price once, print the snapshot and exit
    Snapshot,

    /// Fetch on startup and keep re-rendering; Enter refreshes, q quits
    Watch,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    if !cli.json {
        print_banner();
    }

    let config = commands::common::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Snapshot => commands::snapshot::handle(&config, cli.json).await?,
        Commands::Watch => commands::watch::handle(&config, cli.json).await?,
        Commands::Config => commands::config::handle(&config, cli.json)?,
    }

    Ok(())
}

/// Diagnostics go to stderr so they never interleave with the report.
/// Verbosity comes from RUST_LOG, default `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_banner() {
    println!(
        "{}",
        "╔═══════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        format!(
            "║      DROPWATCH - airdrop snapshot v{:<10} ║",
            env!("CARGO_PKG_VERSION")
        )
        .cyan()
        .bold()
    );
    println!(
        "{}",
        "║     Read-only | Two networks | One snapshot   ║".cyan()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════╝".cyan()
    );
    println!();
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_snapshot() {
        let cli = Cli::try_parse_from(["dropwatch", "snapshot"]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        let cli = cli.unwrap();
        assert!(matches!(cli.command, Commands::Snapshot));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_watch() {
        let cli = Cli::try_parse_from(["dropwatch", "watch"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch));
    }

    #[test]
    fn test_cli_config() {
        let cli = Cli::try_parse_from(["dropwatch", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn test_cli_json_after_subcommand() {
        let cli = Cli::try_parse_from(["dropwatch", "snapshot", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::try_parse_from([
            "dropwatch",
            "--config",
            "/tmp/mock-endpoints.toml",
            "snapshot",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mock-endpoints.toml")));
    }

    #[test]
    fn test_cli_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dropwatch", "snapshot", "--config", "mock.toml", "--json"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Snapshot));
        assert_eq!(cli.config, Some(PathBuf::from("mock.toml")));
        assert!(cli.json);
    }

    #[test]
    fn test_cli_missing_subcommand() {
        assert!(Cli::try_parse_from(["dropwatch"]).is_err());
    }

    #[test]
    fn test_cli_unknown_subcommand() {
        let result = Cli::try_parse_from(["dropwatch", "claim"]);
        assert!(result.is_err());
    }
}
