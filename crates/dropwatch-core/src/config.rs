use crate::{Address, Allocation, TOKEN_DECIMALS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Build-time default configuration.
pub const EMBEDDED_CONFIG: &str = include_str!("../config/airdrop.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Process-wide snapshot configuration: distribution constants, the four
/// balance queries, both network endpoints and the price source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub token_decimals: u32,
    /// Per-request timeout for remote reads. Absent means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub allocation: Allocation,
    pub origin: Network,
    pub destination: Network,
    pub queries: Queries,
    pub price: PriceSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub rpc_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContractQuery {
    pub token: Address,
    pub holder: Address,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Queries {
    /// Token held by the cross-chain hub on the destination network.
    pub hub: ContractQuery,
    /// Wrapped token held by the bonding contract on the origin network.
    pub bonded: ContractQuery,
    /// Wrapped token held by the unclaimed-funds vault on the origin network.
    pub vault: ContractQuery,
    /// Wrapped token held by the time-locked reserve on the origin network.
    pub locker: ContractQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSource {
    pub api_url: String,
    pub asset_id: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Hub,
    Bonded,
    Vault,
    Locker,
}

impl QueryKind {
    pub const ALL: [QueryKind; 4] = [
        QueryKind::Hub,
        QueryKind::Bonded,
        QueryKind::Vault,
        QueryKind::Locker,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QueryKind::Hub => "Hub balance",
            QueryKind::Bonded => "Bonded balance",
            QueryKind::Vault => "Vault balance",
            QueryKind::Locker => "Locker balance",
        }
    }

    /// Hub lives on the destination network, everything else on the origin.
    pub fn on_destination(self) -> bool {
        matches!(self, QueryKind::Hub)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One `balanceOf(holder)` read against a token contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceQuery {
    pub kind: QueryKind,
    pub network: String,
    pub endpoint: String,
    pub token: Address,
    pub holder: Address,
}

impl SnapshotConfig {
    /// Parse and validate the configuration compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(EMBEDDED_CONFIG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SnapshotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a replacement configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_decimals != TOKEN_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "token_decimals must be {}, got {}",
                TOKEN_DECIMALS, self.token_decimals
            )));
        }

        self.allocation.validate().map_err(ConfigError::Invalid)?;

        for network in [&self.origin, &self.destination] {
            if network.name.trim().is_empty() {
                return Err(ConfigError::Invalid("network name cannot be empty".into()));
            }
            validate_url(&network.rpc_url)?;
        }

        validate_url(&self.price.api_url)?;
        if self.price.asset_id.trim().is_empty() {
            return Err(ConfigError::Invalid("price.asset_id cannot be empty".into()));
        }
        if self.price.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("price.currency cannot be empty".into()));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn query(&self, kind: QueryKind) -> BalanceQuery {
        let network = if kind.on_destination() {
            &self.destination
        } else {
            &self.origin
        };
        let pair = match kind {
            QueryKind::Hub => self.queries.hub,
            QueryKind::Bonded => self.queries.bonded,
            QueryKind::Vault => self.queries.vault,
            QueryKind::Locker => self.queries.locker,
        };
        BalanceQuery {
            kind,
            network: network.name.clone(),
            endpoint: network.rpc_url.clone(),
            token: pair.token,
            holder: pair.holder,
        }
    }

    pub fn balance_queries(&self) -> [BalanceQuery; 4] {
        QueryKind::ALL.map(|kind| self.query(kind))
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::Invalid("endpoint URL cannot be empty".into()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "endpoint '{}' must be an http(s) URL",
            url
        )));
    }
    Ok(())
}
