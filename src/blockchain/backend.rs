//! The remote chain as seen by the preparation run.
//!
//! [`BlockchainClient`](crate::blockchain::BlockchainClient) implements this
//! over JSON-RPC. Everything above this seam (transaction workflow, pipeline)
//! is generic over it.

use alloy::primitives::{Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::future::Future;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, Receipt};

/// Read and write access to a chain on behalf of one signer.
pub trait ChainBackend {
    /// Chain ID reported by the node.
    fn chain_id(&self) -> impl Future<Output = BlockchainResult<ChainId>>;

    /// Latest block number.
    fn block_number(&self) -> impl Future<Output = BlockchainResult<u64>>;

    /// Current gas price in wei.
    fn gas_price(&self) -> impl Future<Output = BlockchainResult<u128>>;

    /// Sign and broadcast `tx`, returning its hash once the node accepts it.
    ///
    /// A rejection must surface as [`BlockchainError::Submission`].
    fn send_transaction(
        &self,
        intent: &'static str,
        tx: TransactionRequest,
    ) -> impl Future<Output = BlockchainResult<TxHash>>;

    /// Receipt of a mined transaction, `None` while pending.
    fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<Option<Receipt>>>;

    /// Execute a read-only call against the latest block.
    fn call(&self, tx: TransactionRequest) -> impl Future<Output = BlockchainResult<Bytes>>;

    /// Verify the connected chain ID matches `expected`.
    fn verify_chain_id(&self, expected: ChainId) -> impl Future<Output = BlockchainResult<()>> {
        async move {
            let actual = self.chain_id().await?;
            if actual != expected {
                return Err(BlockchainError::ChainMismatch {
                    expected: expected.0,
                    actual: actual.0,
                });
            }
            Ok(())
        }
    }
}
