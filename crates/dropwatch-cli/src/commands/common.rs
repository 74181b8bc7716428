use dropwatch_core::SnapshotConfig;
use dropwatch_network::{http_client, JsonRpcBalanceReader, QuotePriceReader, RefreshOrchestrator};
use std::path::Path;
use std::time::Duration;

pub type LiveOrchestrator = RefreshOrchestrator<JsonRpcBalanceReader, QuotePriceReader>;

/// Shared config loader: the file named by --config / DROPWATCH_CONFIG if
/// given, otherwise the configuration compiled into the binary.
/// Used by every subcommand.
pub fn load_config(path: Option<&Path>) -> Result<SnapshotConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Config file not found at {}", path.display()).into());
            }
            SnapshotConfig::load_from_file(path)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
        }
        None => SnapshotConfig::embedded()?,
    };
    tracing::debug!(
        origin = %config.origin.rpc_url,
        destination = %config.destination.rpc_url,
        "configuration loaded"
    );
    Ok(config)
}

/// Orchestrator wired to the real JSON-RPC and quote endpoints.
pub fn live_orchestrator(
    config: &SnapshotConfig,
) -> Result<LiveOrchestrator, Box<dyn std::error::Error>> {
    let client = http_client(config.request_timeout_secs.map(Duration::from_secs))
        .map_err(|e| format!("Cannot build HTTP client: {}", e))?;
    Ok(RefreshOrchestrator::new(
        config,
        JsonRpcBalanceReader::new(client.clone()),
        QuotePriceReader::new(client, config.price.clone()),
    ))
}
