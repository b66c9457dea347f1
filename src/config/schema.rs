//! Configuration schema definitions.
//!
//! Tunables for a preparation run. Secrets and network endpoints are not part
//! of this file; they come from the environment (see `config::env`).
//! All types derive Serde traits for deserialization from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for a preparation run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PrepareConfig {
    /// RPC and confirmation settings.
    pub blockchain: BlockchainConfig,

    /// Deployment registry location and key names.
    pub registry: RegistryConfig,

    /// Test token deployment and mint parameters.
    pub token: TokenConfig,

    /// Bridge rate-control thresholds.
    pub rate_control: RateControlConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain interaction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a receipt counts.
    /// The block that includes the transaction is the first confirmation.
    pub confirmation_blocks: u64,

    /// Upper bound on the wait for a receipt, in seconds.
    pub receipt_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            receipt_timeout_secs: 300,
            poll_interval_ms: 2000,
            max_gas_price_gwei: 500,
        }
    }
}

impl BlockchainConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Deployment registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON file mapping logical contract names to addresses.
    pub path: PathBuf,

    /// Key holding the already-deployed bridge address.
    pub bridge_key: String,

    /// Key under which the test token address is recorded.
    pub token_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("contracts/root_contracts.json"),
            bridge_key: "ROOT_BRIDGE_ADDRESS".to_string(),
            token_key: "ROOT_TEST_CUSTOM_TOKEN".to_string(),
        }
    }
}

/// Test token configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Directory holding compiled contract artifacts.
    pub artifacts_dir: PathBuf,

    /// Artifact (contract) name to deploy.
    pub contract_name: String,

    /// ERC20 name constructor argument.
    pub name: String,

    /// ERC20 symbol constructor argument.
    pub symbol: String,

    /// Amount minted to the test account, in whole tokens (18 decimals).
    pub mint_amount: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("out"),
            contract_name: "ERC20PresetMinterPauser".to_string(),
            name: "Custom Token".to_string(),
            symbol: "CTK".to_string(),
            mint_amount: "1000.0".to_string(),
        }
    }
}

/// Bridge rate-control configuration. Amounts are in whole tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateControlConfig {
    /// Name hashed (keccak256) into the rate-control role identifier.
    pub role: String,

    /// Bucket capacity.
    pub capacity: String,

    /// Bucket refill rate per second.
    pub refill_rate: String,

    /// Single transfers above this amount are queued.
    pub large_transfer_threshold: String,
}

impl Default for RateControlConfig {
    fn default() -> Self {
        Self {
            role: "RATE".to_string(),
            capacity: "20016.0".to_string(),
            refill_rate: "5.56".to_string(),
            large_transfer_threshold: "10008.0".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
