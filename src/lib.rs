//! Root-chain bridge test preparation library

pub mod blockchain;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod prepare;
pub mod registry;

pub use config::schema::PrepareConfig;
pub use error::{PrepareError, PrepareResult};
pub use prepare::PreparationSummary;
