//! Top-level error for a preparation run.

use thiserror::Error;

use crate::blockchain::artifacts::ArtifactError;
use crate::blockchain::BlockchainError;
use crate::config::ConfigError;
use crate::lifecycle::ConfirmationError;
use crate::registry::RegistryError;

/// Every failure ends the run; none is retried.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Confirmation failed: {0}")]
    Confirmation(#[from] ConfirmationError),
}

pub type PrepareResult<T> = Result<T, PrepareError>;
