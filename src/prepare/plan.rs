//! Everything a run will do, resolved before the operator is asked.

use alloy::primitives::{Address, Bytes, B256, U256};
use std::fmt::Write as _;

use crate::blockchain::artifacts::load_creation_bytecode;
use crate::blockchain::contracts::role_id;
use crate::blockchain::wallet::parse_private_key;
use crate::blockchain::ChainId;
use crate::config::validation::parse_amount;
use crate::config::{ConfigError, EnvConfig, PrepareConfig};
use crate::error::PrepareResult;
use crate::registry::ContractRegistry;

/// Where the test token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Usable address already in the registry.
    Recorded(Address),
    /// Deploy from this creation bytecode.
    Deploy(Bytes),
}

/// Test token deployment and mint parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPlan {
    /// Registry key the token address lives under.
    pub registry_key: String,
    pub contract_name: String,
    pub name: String,
    pub symbol: String,
    /// Base units minted to the test account.
    pub mint_amount: U256,
    pub source: TokenSource,
}

/// Rate-control thresholds in token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateThresholds {
    pub capacity: U256,
    pub refill_rate: U256,
    pub large_transfer_threshold: U256,
}

/// Resolved inputs of a preparation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparationPlan {
    pub chain_id: ChainId,
    pub bridge: Address,
    pub multisig: Address,
    pub test_account: Address,
    pub token: TokenPlan,
    pub thresholds: RateThresholds,
    /// Rate-control role revoked from the deployer.
    pub rate_role: B256,
}

impl PreparationPlan {
    /// Combine environment, tunables, and the registry into a plan.
    ///
    /// Makes no network calls. The bridge must already be in the registry.
    /// When the token is not, its artifact is loaded here.
    pub fn resolve(
        env: &EnvConfig,
        config: &PrepareConfig,
        registry: &ContractRegistry,
    ) -> PrepareResult<Self> {
        let amount = |field, value: &str| {
            parse_amount(field, value).map_err(|e| ConfigError::Validation(vec![e]))
        };

        let rate = &config.rate_control;
        let thresholds = RateThresholds {
            capacity: amount("rate_control.capacity", &rate.capacity)?,
            refill_rate: amount("rate_control.refill_rate", &rate.refill_rate)?,
            large_transfer_threshold: amount(
                "rate_control.large_transfer_threshold",
                &rate.large_transfer_threshold,
            )?,
        };

        let test_account = parse_private_key(&env.test_account_secret)?.address();
        let bridge = registry.require_address(&config.registry.bridge_key)?;

        let token = &config.token;
        let source = match registry.address(&config.registry.token_key) {
            Some(address) => TokenSource::Recorded(address),
            None => TokenSource::Deploy(load_creation_bytecode(
                &token.artifacts_dir,
                &token.contract_name,
            )?),
        };
        let token = TokenPlan {
            registry_key: config.registry.token_key.clone(),
            contract_name: token.contract_name.clone(),
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            mint_amount: amount("token.mint_amount", &token.mint_amount)?,
            source,
        };

        Ok(Self {
            chain_id: ChainId(env.chain_id),
            bridge,
            multisig: env.multisig,
            test_account,
            token,
            thresholds,
            rate_role: role_id(&rate.role),
        })
    }

    /// Human-readable plan shown before confirmation.
    pub fn describe(&self, deployer: Address) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Chain ID:      {}", self.chain_id.0);
        let _ = writeln!(out, "Deployer:      {}", deployer);
        let _ = writeln!(out, "Bridge:        {}", self.bridge);
        let _ = writeln!(out, "Multisig:      {}", self.multisig);
        let _ = writeln!(out, "Test account:  {}", self.test_account);
        match &self.token.source {
            TokenSource::Recorded(token) => {
                let _ = writeln!(out, "Token:         reuse {}", token);
            }
            TokenSource::Deploy(_) => {
                let _ = writeln!(
                    out,
                    "Token:         deploy {} ({}, {})",
                    self.token.contract_name, self.token.name, self.token.symbol
                );
            }
        }
        let _ = writeln!(out, "Mint amount:   {} wei", self.token.mint_amount);
        let _ = writeln!(
            out,
            "Rate control:  capacity {} / refill {} / large transfer {} wei",
            self.thresholds.capacity,
            self.thresholds.refill_rate,
            self.thresholds.large_transfer_threshold
        );
        let _ = write!(out, "Then revoke the rate-control and admin roles from the deployer.");
        out
    }
}
