//! Required values resolved from the process environment.
//!
//! # Security
//! - Secrets are read ONLY from environment variables (optionally seeded from a `.env` file)
//! - `Debug` output redacts every secret

use alloy::primitives::Address;
use std::fmt;
use url::Url;

use crate::config::loader::ConfigError;

pub const ROOT_RPC_URL: &str = "ROOT_RPC_URL";
pub const ROOT_CHAIN_ID: &str = "ROOT_CHAIN_ID";
pub const DEPLOYER_SECRET: &str = "DEPLOYER_SECRET";
pub const DEPLOYER_LEDGER_INDEX: &str = "DEPLOYER_LEDGER_INDEX";
pub const TEST_ACCOUNT_SECRET: &str = "TEST_ACCOUNT_SECRET";
pub const PRIVILEGED_ROOT_MULTISIG_ADDR: &str = "PRIVILEGED_ROOT_MULTISIG_ADDR";

/// `DEPLOYER_SECRET` value that selects the hardware signer.
pub const LEDGER_SENTINEL: &str = "ledger";

/// How the deployer signs transactions.
#[derive(Clone, PartialEq, Eq)]
pub enum DeployerCredential {
    /// Hex-encoded private key.
    PrivateKey(String),
    /// Ledger account at `m/44'/60'/{index}'/0/0`.
    Ledger { index: usize },
}

impl fmt::Debug for DeployerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
            Self::Ledger { index } => f.debug_struct("Ledger").field("index", index).finish(),
        }
    }
}

/// Environment values a preparation run cannot start without.
#[derive(Clone)]
pub struct EnvConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub deployer: DeployerCredential,
    pub test_account_secret: String,
    pub multisig: Address,
}

impl EnvConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` to read variables. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };

        let rpc_url = require(ROOT_RPC_URL)?;
        let chain_id = require(ROOT_CHAIN_ID)?;
        let deployer_secret = require(DEPLOYER_SECRET)?;
        let test_account_secret = require(TEST_ACCOUNT_SECRET)?;
        let multisig = require(PRIVILEGED_ROOT_MULTISIG_ADDR)?;

        let rpc_url = rpc_url.parse::<Url>().map_err(|e| ConfigError::InvalidEnv {
            name: ROOT_RPC_URL,
            reason: e.to_string(),
        })?;
        let chain_id = chain_id.parse::<u64>().map_err(|e| ConfigError::InvalidEnv {
            name: ROOT_CHAIN_ID,
            reason: e.to_string(),
        })?;
        let multisig = multisig.parse::<Address>().map_err(|e| ConfigError::InvalidEnv {
            name: PRIVILEGED_ROOT_MULTISIG_ADDR,
            reason: e.to_string(),
        })?;

        let deployer = if deployer_secret == LEDGER_SENTINEL {
            let index = require(DEPLOYER_LEDGER_INDEX)?;
            let index = index.parse::<usize>().map_err(|e| ConfigError::InvalidEnv {
                name: DEPLOYER_LEDGER_INDEX,
                reason: e.to_string(),
            })?;
            DeployerCredential::Ledger { index }
        } else {
            DeployerCredential::PrivateKey(deployer_secret)
        };

        Ok(Self {
            rpc_url,
            chain_id,
            deployer,
            test_account_secret,
            multisig,
        })
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("deployer", &self.deployer)
            .field("test_account_secret", &"<redacted>")
            .field("multisig", &self.multisig)
            .finish()
    }
}
