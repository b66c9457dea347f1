//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint with the deployer's wallet attached
//! - Query chain state (chain id, block number, gas price, receipts)
//! - Broadcast signed transactions and run read-only calls
//! - Bound every RPC request with the configured timeout

use alloy::network::EthereumWallet;
use alloy::primitives::{Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::backend::ChainBackend;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, Receipt};
use crate::config::BlockchainConfig;

/// JSON-RPC chain client. Transactions are signed by the attached wallet.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    rpc_url: Url,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Build a client for `rpc_url` that signs with `wallet`.
    ///
    /// No request is made until the first call.
    pub fn connect(rpc_url: &Url, wallet: EthereumWallet, config: &BlockchainConfig) -> Self {
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(rpc_url.clone())
            .erased();

        tracing::info!(
            rpc_url = %rpc_url,
            timeout_secs = config.rpc_timeout_secs,
            "Blockchain client initialized"
        );

        Self {
            provider,
            rpc_url: rpc_url.clone(),
            timeout_duration: config.rpc_timeout(),
        }
    }

    async fn timed<T, E, F>(&self, operation: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{}: {}", operation, e)))
            }
            Err(_) => {
                tracing::warn!(operation, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

impl ChainBackend for BlockchainClient {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.timed("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.timed("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.timed("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn send_transaction(
        &self,
        intent: &'static str,
        tx: TransactionRequest,
    ) -> BlockchainResult<TxHash> {
        // Fillers estimate gas, assign the nonce, and sign before broadcast.
        match timeout(self.timeout_duration, self.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(BlockchainError::Submission {
                intent,
                reason: e.to_string(),
            }),
            Err(_) => Err(BlockchainError::BroadcastTimeout {
                intent,
                timeout: self.timeout_duration,
            }),
        }
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        let receipt = self
            .timed(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;
        Ok(receipt.as_ref().and_then(Receipt::from_rpc))
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.timed("eth_call", self.provider.call(tx).into_future())
            .await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
