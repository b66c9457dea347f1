//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, at least one confirmation)
//! - Check that every token amount parses as an 18-decimal quantity
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PrepareConfig → Result<(), Vec<ValidationError>>
//! - Runs before any network activity

use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;
use std::fmt;

use crate::config::schema::PrepareConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `token.mint_amount`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Parse a whole-token amount (e.g. `"5.56"`) into its 18-decimal base units.
pub fn parse_amount(field: &'static str, value: &str) -> Result<U256, ValidationError> {
    parse_ether(value.trim())
        .map_err(|e| ValidationError::new(field, format!("invalid amount '{}': {}", value, e)))
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &PrepareConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.blockchain;
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than 0"));
    }
    if chain.confirmation_blocks == 0 {
        errors.push(ValidationError::new("blockchain.confirmation_blocks", "must be at least 1"));
    }
    if chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.receipt_timeout_secs", "must be greater than 0"));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be greater than 0"));
    }

    let registry = &config.registry;
    if registry.bridge_key.trim().is_empty() {
        errors.push(ValidationError::new("registry.bridge_key", "must not be empty"));
    }
    if registry.token_key.trim().is_empty() {
        errors.push(ValidationError::new("registry.token_key", "must not be empty"));
    }

    let token = &config.token;
    if token.contract_name.trim().is_empty() {
        errors.push(ValidationError::new("token.contract_name", "must not be empty"));
    }
    if token.symbol.trim().is_empty() {
        errors.push(ValidationError::new("token.symbol", "must not be empty"));
    }

    let rate = &config.rate_control;
    if rate.role.is_empty() {
        errors.push(ValidationError::new("rate_control.role", "must not be empty"));
    }

    let amounts = [
        ("token.mint_amount", token.mint_amount.as_str()),
        ("rate_control.capacity", rate.capacity.as_str()),
        ("rate_control.refill_rate", rate.refill_rate.as_str()),
        ("rate_control.large_transfer_threshold", rate.large_transfer_threshold.as_str()),
    ];
    for (field, value) in amounts {
        if let Err(e) = parse_amount(field, value) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
