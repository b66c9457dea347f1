//! Chain-specific types and error definitions.

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionReceipt;
use std::time::Duration;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The network rejected the call before inclusion.
    #[error("Submission of {intent} rejected: {reason}")]
    Submission { intent: &'static str, reason: String },

    /// Gas price exceeded maximum allowed; nothing was sent.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Broadcast did not answer in time; the transaction may still have been sent.
    #[error("Broadcast of {intent} timed out after {timeout:?}; it may have been sent, check the deployer's pending transactions")]
    BroadcastTimeout { intent: &'static str, timeout: Duration },

    /// Transaction was accepted but no receipt arrived in time.
    #[error("No receipt for transaction {tx_hash} after {timeout:?}")]
    ReceiptTimeout { tx_hash: TxHash, timeout: Duration },

    /// Transaction was mined but reverted on-chain.
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    /// A deployment receipt did not report a contract address.
    #[error("Transaction {tx_hash} created no contract")]
    NoContractCreated { tx_hash: TxHash },

    /// Invalid private key, hardware signer failure, or unsupported signer.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Return data from a read-only call could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub gas_used: u64,
    /// Address of the contract created by a deployment.
    pub contract_address: Option<Address>,
}

impl Receipt {
    /// Convert an RPC receipt. Returns `None` while the receipt has no block yet.
    pub fn from_rpc(receipt: &TransactionReceipt) -> Option<Self> {
        let block_number = ReceiptResponse::block_number(receipt)?;
        Some(Self {
            tx_hash: ReceiptResponse::transaction_hash(receipt),
            block_number,
            success: ReceiptResponse::status(receipt),
            gas_used: ReceiptResponse::gas_used(receipt),
            contract_address: ReceiptResponse::contract_address(receipt),
        })
    }
}
