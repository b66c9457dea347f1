//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, dotenvy)
//!     → process environment
//!     → env.rs (required secrets, RPC endpoint, multisig)
//!
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PrepareConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All tunables have defaults; a run needs no config file
//! - Missing environment values fail before any network activity

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{DeployerCredential, EnvConfig};
pub use loader::ConfigError;
pub use schema::{
    BlockchainConfig, ObservabilityConfig, PrepareConfig, RateControlConfig, RegistryConfig,
    TokenConfig,
};
