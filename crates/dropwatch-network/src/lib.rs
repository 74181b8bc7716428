// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DROPWATCH - NETWORK MODULE
//
// Read-only remote access: ERC-20 balanceOf over JSON-RPC, spot price over
// HTTP, and the orchestrator that settles the five result cells of a refresh.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod balance;
pub mod error;
pub mod orchestrator;
pub mod price;

pub use balance::{BalanceReader, JsonRpcBalanceReader};
pub use error::ReadError;
pub use orchestrator::{RefreshOrchestrator, RefreshOutcome, SnapshotCells, SnapshotStore};
pub use price::{PriceReader, QuotePriceReader};

use std::time::Duration;

/// Shared HTTP client for both readers. `None` leaves requests unbounded.
/// A builder failure is returned rather than replaced by a client without
/// the configured timeout.
pub fn http_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let builder = reqwest::Client::builder().user_agent(concat!(
        "dropwatch/",
        env!("CARGO_PKG_VERSION")
    ));
    let builder = match timeout {
        Some(t) => builder.timeout(t),
        None => builder,
    };
    builder.build()
}
