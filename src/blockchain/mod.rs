//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (deployer secret or ledger index, RPC URL)
//!     → wallet.rs (key loading, signer selection)
//!     → client.rs (RPC connection with timeouts, implements backend.rs)
//!     → transaction.rs (encode intent, broadcast, await receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Submissions are never retried

pub mod artifacts;
pub mod client;
pub mod contracts;
pub mod backend;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use backend::ChainBackend;
pub use transaction::{ReceiptPolicy, SubmittedTransaction, TxIntent, TxWorkflow};
pub use types::{BlockchainError, BlockchainResult, ChainId, Receipt};
pub use wallet::DeployerSigner;
