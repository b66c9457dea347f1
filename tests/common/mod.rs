//! Shared fixtures for preparation tests: an in-memory chain and a
//! workspace with registry and artifact files.

#![allow(dead_code)]

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash, TxKind, B256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bridge_prep::blockchain::contracts::IRootERC20BridgeFlowRate;
use bridge_prep::blockchain::wallet::parse_private_key;
use bridge_prep::blockchain::{
    BlockchainError, BlockchainResult, ChainId, ChainBackend, ReceiptPolicy, Receipt, TxWorkflow,
};
use bridge_prep::config::{DeployerCredential, EnvConfig, PrepareConfig};
use bridge_prep::prepare::{Preparation, PreparationPlan, Resolved};
use bridge_prep::registry::ContractRegistry;
use bridge_prep::PrepareResult;

// Anvil accounts 0, 1, 2.
pub const DEPLOYER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ACCOUNT_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const TEST_ACCOUNT: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const MULTISIG: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

pub const BRIDGE: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");
/// Address the mock assigns to the next deployed contract.
pub const NEW_TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const EXISTING_TOKEN: Address = address!("0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");

pub const CHAIN_ID: u64 = 31337;

/// A transaction the mock accepted.
#[derive(Debug, Clone)]
pub struct SentTx {
    pub intent: &'static str,
    pub request: TransactionRequest,
    pub tx_hash: TxHash,
}

impl SentTx {
    pub fn input(&self) -> Bytes {
        self.request.input.input().cloned().unwrap_or_default()
    }

    pub fn is_create(&self) -> bool {
        self.request.to == Some(TxKind::Create)
    }

    pub fn target(&self) -> Option<Address> {
        match self.request.to {
            Some(TxKind::Call(to)) => Some(to),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct MockState {
    pub chain_id: u64,
    pub block_number: u64,
    /// Blocks produced between consecutive block number queries.
    pub blocks_per_query: u64,
    pub gas_price: u128,
    /// Include sent transactions in a block immediately.
    pub mine: bool,
    /// Reject sends of this intent.
    pub reject: Option<&'static str>,
    /// Mine this intent as reverted.
    pub revert: Option<&'static str>,
    /// Receipt polls that fail before one succeeds.
    pub failing_polls: usize,
    pub deploy_address: Address,
    pub default_admin_role: B256,
    pub roles: HashSet<(B256, Address)>,
    pub sent: Vec<SentTx>,
    pub receipts: HashMap<TxHash, Receipt>,
    /// Every backend request, in order.
    pub requests: Vec<&'static str>,
}

impl Default for MockState {
    fn default() -> Self {
        let rate_role = keccak256("RATE");
        let admin_role = B256::ZERO;
        Self {
            chain_id: CHAIN_ID,
            block_number: 1,
            blocks_per_query: 0,
            gas_price: 1_000_000_000,
            mine: true,
            reject: None,
            revert: None,
            failing_polls: 0,
            deploy_address: NEW_TOKEN,
            default_admin_role: admin_role,
            roles: HashSet::from([
                (admin_role, DEPLOYER),
                (rate_role, DEPLOYER),
                (admin_role, MULTISIG),
                (rate_role, MULTISIG),
            ]),
            sent: Vec::new(),
            receipts: HashMap::new(),
            requests: Vec::new(),
        }
    }
}

/// In-memory chain with a bridge that tracks role membership.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<MockState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.with(|s| s.sent.clone())
    }

    pub fn sent_intents(&self) -> Vec<&'static str> {
        self.with(|s| s.sent.iter().map(|tx| tx.intent).collect())
    }

    pub fn requests(&self) -> Vec<&'static str> {
        self.with(|s| s.requests.clone())
    }

    pub fn has_role(&self, role: B256, account: Address) -> bool {
        self.with(|s| s.roles.contains(&(role, account)))
    }
}

impl ChainBackend for MockChain {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.with(|s| {
            s.requests.push("chain_id");
            Ok(ChainId(s.chain_id))
        })
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.with(|s| {
            s.requests.push("block_number");
            s.block_number += s.blocks_per_query;
            Ok(s.block_number)
        })
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.with(|s| {
            s.requests.push("gas_price");
            Ok(s.gas_price)
        })
    }

    async fn send_transaction(
        &self,
        intent: &'static str,
        tx: TransactionRequest,
    ) -> BlockchainResult<TxHash> {
        self.with(|s| {
            s.requests.push("send_transaction");
            if s.reject == Some(intent) {
                return Err(BlockchainError::Submission {
                    intent,
                    reason: "insufficient funds for gas * price + value".to_string(),
                });
            }

            let tx_hash = keccak256((s.sent.len() as u64).to_be_bytes());
            let sent = SentTx {
                intent,
                request: tx,
                tx_hash,
            };

            let input = sent.input();
            if input.starts_with(&IRootERC20BridgeFlowRate::revokeRoleCall::SELECTOR) {
                let call = IRootERC20BridgeFlowRate::revokeRoleCall::abi_decode(&input)
                    .expect("valid revokeRole calldata");
                s.roles.remove(&(call.role, call.account));
            }

            if s.mine {
                s.block_number += 1;
                let receipt = Receipt {
                    tx_hash,
                    block_number: s.block_number,
                    success: s.revert != Some(intent),
                    gas_used: 21_000,
                    contract_address: sent.is_create().then_some(s.deploy_address),
                };
                s.receipts.insert(tx_hash, receipt);
            }

            s.sent.push(sent);
            Ok(tx_hash)
        })
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        self.with(|s| {
            s.requests.push("transaction_receipt");
            if s.failing_polls > 0 {
                s.failing_polls -= 1;
                return Err(BlockchainError::Rpc("connection reset by peer".to_string()));
            }
            Ok(s.receipts.get(&tx_hash).cloned())
        })
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.with(|s| {
            s.requests.push("call");
            let input = tx.input.input().cloned().unwrap_or_default();

            if input.starts_with(&IRootERC20BridgeFlowRate::DEFAULT_ADMIN_ROLECall::SELECTOR) {
                return Ok(Bytes::from(s.default_admin_role.abi_encode()));
            }
            if input.starts_with(&IRootERC20BridgeFlowRate::hasRoleCall::SELECTOR) {
                let call = IRootERC20BridgeFlowRate::hasRoleCall::abi_decode(&input)
                    .map_err(|e| BlockchainError::Rpc(e.to_string()))?;
                let member = s.roles.contains(&(call.role, call.account));
                return Ok(Bytes::from(member.abi_encode()));
            }
            Err(BlockchainError::Rpc("execution reverted".to_string()))
        })
    }
}

/// Fast receipt policy for tests.
pub fn fast_policy() -> ReceiptPolicy {
    ReceiptPolicy {
        confirmations: 1,
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(5),
    }
}

/// Temporary workspace with a registry file and a token artifact.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub config: PrepareConfig,
    pub chain: MockChain,
    pub policy: ReceiptPolicy,
}

impl Fixture {
    /// Registry holding only the bridge address.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let artifacts = dir.path().join("out");
        let artifact = artifacts
            .join("ERC20PresetMinterPauser.sol")
            .join("ERC20PresetMinterPauser.json");
        fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        fs::write(&artifact, r#"{"abi": [], "bytecode": {"object": "0x6080604052"}}"#).unwrap();

        let mut config = PrepareConfig::default();
        config.registry.path = dir.path().join("root_contracts.json");
        config.token.artifacts_dir = artifacts;

        let fixture = Self {
            dir,
            config,
            chain: MockChain::new(),
            policy: fast_policy(),
        };
        fixture.write_registry(&[
            ("ROOT_BRIDGE_ADDRESS", BRIDGE.to_string()),
            ("ROOT_TEST_CUSTOM_TOKEN", String::new()),
        ]);
        fixture
    }

    pub fn registry_path(&self) -> PathBuf {
        self.config.registry.path.clone()
    }

    pub fn write_registry(&self, entries: &[(&str, String)]) {
        let map: HashMap<&str, &str> = entries.iter().map(|(k, v)| (*k, v.as_str())).collect();
        fs::write(self.registry_path(), serde_json::to_string_pretty(&map).unwrap()).unwrap();
    }

    pub fn registry(&self) -> ContractRegistry {
        ContractRegistry::load(self.registry_path()).unwrap()
    }

    pub fn env(&self) -> EnvConfig {
        EnvConfig {
            rpc_url: "http://localhost:8545".parse().unwrap(),
            chain_id: CHAIN_ID,
            deployer: DeployerCredential::PrivateKey(DEPLOYER_KEY.to_string()),
            test_account_secret: TEST_ACCOUNT_KEY.to_string(),
            multisig: MULTISIG,
        }
    }

    /// Resolve a run against the mock chain.
    pub async fn resolve(&self) -> PrepareResult<Preparation<MockChain, Resolved>> {
        let registry = self.registry();
        let plan = PreparationPlan::resolve(&self.env(), &self.config, &registry)?;
        let deployer = parse_private_key(DEPLOYER_KEY)?.address();
        let workflow = TxWorkflow::new(self.chain.clone(), deployer, &self.config.blockchain)
            .with_policy(self.policy);
        Preparation::resolve(workflow, registry, plan).await
    }
}
