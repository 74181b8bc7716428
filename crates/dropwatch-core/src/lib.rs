// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DROPWATCH - CORE MODULE
//
// Airdrop distribution primitives: TokenAmount, Address, per-input Cell and
// the pure derivation from four on-chain balances to the snapshot statistics.
// All token arithmetic uses u128 base units (no floating-point); only ratios
// and percentages are f64.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod address;
pub mod allocation;
pub mod amount;
pub mod cell;
pub mod config;
pub mod derive;

pub use address::{Address, AddressError};
pub use allocation::Allocation;
pub use amount::{AmountError, TokenAmount};
pub use cell::Cell;
pub use config::{BalanceQuery, ConfigError, QueryKind, SnapshotConfig};
pub use derive::{clamp01, derive, DerivedSnapshot, SnapshotInputs};

/// Decimal places applied uniformly to every token in this domain.
pub const TOKEN_DECIMALS: u32 = 18;

/// 1 token = 10^18 base units
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Literal rendered in place of a ratio that has no defined value
/// (zero denominator, non-finite quotient or an unsettled input).
pub const UNDEFINED: &str = "undefined";

/// Render a ratio as a percentage with two decimals, or `undefined`.
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => UNDEFINED.to_string(),
    }
}

/// Render a plain ratio with four decimals, or `undefined`.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.4}", r),
        None => UNDEFINED.to_string(),
    }
}
