//! Transaction submission and confirmation.
//!
//! # Responsibilities
//! - Encode each intent into a transaction request
//! - Guard submissions with the gas price ceiling
//! - Broadcast exactly once; a rejection is surfaced, never retried
//! - Poll for the receipt until mined with enough confirmations or the deadline passes
//!
//! A receipt timeout is fatal: resubmitting could execute the call twice.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::contracts::{IERC20PresetMinterPauser, IRootERC20BridgeFlowRate};
use crate::blockchain::backend::ChainBackend;
use crate::blockchain::types::{BlockchainError, BlockchainResult, Receipt};
use crate::config::BlockchainConfig;

/// A state-changing call that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxIntent {
    /// Deploy the test token with `(name, symbol)` constructor arguments.
    DeployToken {
        bytecode: Bytes,
        name: String,
        symbol: String,
    },
    Mint {
        token: Address,
        to: Address,
        amount: U256,
    },
    SetRateControlThreshold {
        bridge: Address,
        token: Address,
        capacity: U256,
        refill_rate: U256,
        large_transfer_threshold: U256,
    },
    RevokeRole {
        bridge: Address,
        role: B256,
        account: Address,
    },
}

impl TxIntent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeployToken { .. } => "deploy-token",
            Self::Mint { .. } => "mint",
            Self::SetRateControlThreshold { .. } => "set-rate-control-threshold",
            Self::RevokeRole { .. } => "revoke-role",
        }
    }

    /// Build the unsigned request sent from `from`.
    pub fn to_request(&self, from: Address) -> TransactionRequest {
        let tx = TransactionRequest::default().with_from(from);
        match self {
            Self::DeployToken {
                bytecode,
                name,
                symbol,
            } => {
                let mut code = bytecode.to_vec();
                code.extend_from_slice(&(name.clone(), symbol.clone()).abi_encode_params());
                tx.with_deploy_code(code)
            }
            Self::Mint { token, to, amount } => tx.with_to(*token).with_call(
                &IERC20PresetMinterPauser::mintCall {
                    to: *to,
                    amount: *amount,
                },
            ),
            Self::SetRateControlThreshold {
                bridge,
                token,
                capacity,
                refill_rate,
                large_transfer_threshold,
            } => tx.with_to(*bridge).with_call(
                &IRootERC20BridgeFlowRate::setRateControlThresholdCall {
                    token: *token,
                    capacity: *capacity,
                    refillRate: *refill_rate,
                    largeTransferThreshold: *large_transfer_threshold,
                },
            ),
            Self::RevokeRole {
                bridge,
                role,
                account,
            } => tx.with_to(*bridge).with_call(&IRootERC20BridgeFlowRate::revokeRoleCall {
                role: *role,
                account: *account,
            }),
        }
    }
}

/// An intent the network has accepted, identified by its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub intent: &'static str,
    pub tx_hash: TxHash,
}

/// How long and how often to wait for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    /// Required confirmations; the including block is the first.
    pub confirmations: u64,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl From<&BlockchainConfig> for ReceiptPolicy {
    fn from(config: &BlockchainConfig) -> Self {
        Self {
            confirmations: config.confirmation_blocks.max(1),
            timeout: config.receipt_timeout(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Submits intents on behalf of one sender and waits for their receipts.
pub struct TxWorkflow<B> {
    backend: B,
    sender: Address,
    policy: ReceiptPolicy,
    max_gas_price_gwei: u64,
}

impl<B: ChainBackend> TxWorkflow<B> {
    pub fn new(backend: B, sender: Address, config: &BlockchainConfig) -> Self {
        Self {
            backend,
            sender,
            policy: ReceiptPolicy::from(config),
            max_gas_price_gwei: config.max_gas_price_gwei,
        }
    }

    /// Override the receipt policy.
    pub fn with_policy(mut self, policy: ReceiptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Address transactions are sent from.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Send `intent` once. A rejection is returned to the caller unchanged.
    pub async fn submit(&self, intent: &TxIntent) -> BlockchainResult<SubmittedTransaction> {
        let label = intent.label();

        let gas_price = self.backend.gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;
        if gas_price_gwei > u128::from(self.max_gas_price_gwei) {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: u64::try_from(gas_price_gwei).unwrap_or(u64::MAX),
                max_gwei: self.max_gas_price_gwei,
            });
        }

        let tx_hash = self
            .backend
            .send_transaction(label, intent.to_request(self.sender))
            .await?;

        tracing::info!(intent = label, tx_hash = %tx_hash, "Transaction submitted");
        Ok(SubmittedTransaction {
            intent: label,
            tx_hash,
        })
    }

    /// Wait until `tx_hash` is mined with the required confirmations.
    ///
    /// Transient RPC errors are logged and polling continues until the deadline.
    pub async fn await_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        let required = self.policy.confirmations;

        let result = timeout(self.policy.timeout, async {
            let mut ticker = interval(self.policy.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = match self.backend.transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                        continue;
                    }
                };

                if !receipt.success {
                    return Err(BlockchainError::Reverted { tx_hash });
                }

                if required <= 1 {
                    return Ok(receipt);
                }

                let current_block = match self.backend.block_number().await {
                    Ok(n) => n,
                    Err(e) => {
                        tracing::warn!(error = %e, "Block number poll failed");
                        continue;
                    }
                };
                let confirmations = current_block.saturating_sub(receipt.block_number) + 1;
                if confirmations >= required {
                    return Ok(receipt);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations,
                    required,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(BlockchainError::ReceiptTimeout {
                tx_hash,
                timeout: self.policy.timeout,
            }),
        }
    }

    /// Submit `intent` and wait for its receipt.
    pub async fn execute(&self, intent: &TxIntent) -> BlockchainResult<Receipt> {
        let submitted = self.submit(intent).await?;
        let receipt = self.await_receipt(submitted.tx_hash).await?;

        tracing::info!(
            intent = submitted.intent,
            tx_hash = %receipt.tx_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        Ok(receipt)
    }

    /// Run a read-only call against `to` and decode its return value.
    pub async fn read<C: SolCall>(&self, to: Address, call: C) -> BlockchainResult<C::Return> {
        let tx = TransactionRequest::default().with_to(to).with_call(&call);
        let output = self.backend.call(tx).await?;
        C::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Decode(format!("{}: {}", C::SIGNATURE, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, TxKind};

    const TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const BRIDGE: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const SENDER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn input(tx: &TransactionRequest) -> Bytes {
        tx.input.input().cloned().unwrap_or_default()
    }

    #[test]
    fn test_mint_request_encoding() {
        let to = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let intent = TxIntent::Mint {
            token: TOKEN,
            to,
            amount: U256::from(42u64),
        };
        let tx = intent.to_request(SENDER);

        assert_eq!(tx.from, Some(SENDER));
        assert_eq!(tx.to, Some(TxKind::Call(TOKEN)));
        let decoded = IERC20PresetMinterPauser::mintCall::abi_decode(&input(&tx)).unwrap();
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.amount, U256::from(42u64));
    }

    #[test]
    fn test_deploy_request_appends_constructor_args() {
        let intent = TxIntent::DeployToken {
            bytecode: Bytes::from_static(&[0x60, 0x80]),
            name: "Custom Token".to_string(),
            symbol: "CTK".to_string(),
        };
        let tx = intent.to_request(SENDER);

        assert_eq!(tx.to, Some(TxKind::Create));
        let data = input(&tx);
        assert_eq!(&data[..2], &[0x60, 0x80]);
        let (name, symbol) = <(String, String)>::abi_decode_params(&data[2..]).unwrap();
        assert_eq!(name, "Custom Token");
        assert_eq!(symbol, "CTK");
    }

    #[test]
    fn test_revoke_role_targets_bridge() {
        let role = B256::repeat_byte(0x11);
        let intent = TxIntent::RevokeRole {
            bridge: BRIDGE,
            role,
            account: SENDER,
        };
        let tx = intent.to_request(SENDER);

        assert_eq!(intent.label(), "revoke-role");
        assert_eq!(tx.to, Some(TxKind::Call(BRIDGE)));
        let decoded = IRootERC20BridgeFlowRate::revokeRoleCall::abi_decode(&input(&tx)).unwrap();
        assert_eq!(decoded.role, role);
        assert_eq!(decoded.account, SENDER);
    }

    #[test]
    fn test_receipt_policy_from_config() {
        let config = BlockchainConfig {
            confirmation_blocks: 0,
            receipt_timeout_secs: 30,
            poll_interval_ms: 250,
            ..BlockchainConfig::default()
        };
        let policy = ReceiptPolicy::from(&config);
        assert_eq!(policy.confirmations, 1);
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.poll_interval, Duration::from_millis(250));
    }
}
