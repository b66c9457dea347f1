//! The preparation run as a chain of typed stages.
//!
//! ```text
//! Resolved → Gated → TokenReady → Minted → ThresholdsSet
//!          → RateRoleRevoked → AdminRoleRevoked → PreparationSummary
//! ```
//!
//! Each step consumes the previous stage, so steps cannot be skipped,
//! reordered, or repeated. A failed step ends the run; effects already mined
//! stay on-chain.

use alloy::primitives::{Address, B256};
use tokio::io::AsyncBufRead;

use crate::blockchain::contracts::IRootERC20BridgeFlowRate;
use crate::blockchain::{BlockchainError, ChainBackend, TxIntent, TxWorkflow};
use crate::error::PrepareResult;
use crate::lifecycle::{ConfirmationGate, Confirmed};
use crate::prepare::plan::{PreparationPlan, TokenSource};
use crate::prepare::summary::PreparationSummary;
use crate::registry::ContractRegistry;

/// The test token the run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    /// `false` when reused from the registry.
    pub deployed: bool,
}

/// Environment resolved and chain verified; nothing sent yet.
#[derive(Debug)]
pub struct Resolved;

/// Operator approved the run.
#[derive(Debug)]
pub struct Gated {
    _confirmed: Confirmed,
}

#[derive(Debug)]
pub struct TokenReady(TokenInfo);

#[derive(Debug)]
pub struct Minted(TokenInfo);

#[derive(Debug)]
pub struct ThresholdsSet(TokenInfo);

#[derive(Debug)]
pub struct RateRoleRevoked(TokenInfo);

#[derive(Debug)]
pub struct AdminRoleRevoked {
    token: TokenInfo,
    admin_role: B256,
}

/// A preparation run at stage `S`.
pub struct Preparation<B, S> {
    workflow: TxWorkflow<B>,
    registry: ContractRegistry,
    plan: PreparationPlan,
    state: S,
}

impl<B, S> Preparation<B, S> {
    fn advance<T>(self, state: T) -> Preparation<B, T> {
        Preparation {
            workflow: self.workflow,
            registry: self.registry,
            plan: self.plan,
            state,
        }
    }
}

impl<B: ChainBackend> Preparation<B, Resolved> {
    /// Start a run after checking the node serves the planned chain.
    pub async fn resolve(
        workflow: TxWorkflow<B>,
        registry: ContractRegistry,
        plan: PreparationPlan,
    ) -> PrepareResult<Self> {
        workflow.backend().verify_chain_id(plan.chain_id).await?;

        tracing::info!(
            deployer = %workflow.sender(),
            bridge = %plan.bridge,
            multisig = %plan.multisig,
            chain_id = plan.chain_id.0,
            "Environment resolved"
        );

        Ok(Self {
            workflow,
            registry,
            plan,
            state: Resolved,
        })
    }

    /// Show the plan and wait for the operator.
    pub async fn await_confirmation<R>(
        self,
        gate: ConfirmationGate<R>,
    ) -> PrepareResult<Preparation<B, Gated>>
    where
        R: AsyncBufRead + Unpin,
    {
        let description = self.plan.describe(self.workflow.sender());
        let confirmed = gate.await_confirmation(&description).await?;
        Ok(self.advance(Gated {
            _confirmed: confirmed,
        }))
    }
}

impl<B: ChainBackend> Preparation<B, Gated> {
    /// Reuse the recorded token, or deploy one and record it.
    pub async fn ensure_token_deployed(mut self) -> PrepareResult<Preparation<B, TokenReady>> {
        let token = &self.plan.token;

        let bytecode = match &token.source {
            TokenSource::Recorded(address) => {
                let address = *address;
                tracing::info!(token = %address, "Test token already deployed, skip");
                return Ok(self.advance(TokenReady(TokenInfo {
                    address,
                    deployed: false,
                })));
            }
            TokenSource::Deploy(bytecode) => bytecode.clone(),
        };

        tracing::info!(contract = %token.contract_name, "Deploying test token");
        let receipt = self
            .workflow
            .execute(&TxIntent::DeployToken {
                bytecode,
                name: token.name.clone(),
                symbol: token.symbol.clone(),
            })
            .await?;

        let address = receipt
            .contract_address
            .ok_or(BlockchainError::NoContractCreated {
                tx_hash: receipt.tx_hash,
            })?;
        let key = token.registry_key.clone();
        self.registry.record(&key, address)?;
        tracing::info!(token = %address, "Test token deployed");

        Ok(self.advance(TokenReady(TokenInfo {
            address,
            deployed: true,
        })))
    }
}

impl<B: ChainBackend> Preparation<B, TokenReady> {
    /// Mint the configured amount to the test account.
    pub async fn mint(self) -> PrepareResult<Preparation<B, Minted>> {
        let TokenReady(token) = self.state;
        tracing::info!(
            token = %token.address,
            to = %self.plan.test_account,
            amount = %self.plan.token.mint_amount,
            "Minting tokens"
        );

        self.workflow
            .execute(&TxIntent::Mint {
                token: token.address,
                to: self.plan.test_account,
                amount: self.plan.token.mint_amount,
            })
            .await?;

        Ok(self.advance(Minted(token)))
    }
}

impl<B: ChainBackend> Preparation<B, Minted> {
    /// Configure the bridge's rate-control thresholds for the token.
    pub async fn set_rate_thresholds(self) -> PrepareResult<Preparation<B, ThresholdsSet>> {
        let Minted(token) = self.state;
        let thresholds = self.plan.thresholds;
        tracing::info!(
            token = %token.address,
            capacity = %thresholds.capacity,
            refill_rate = %thresholds.refill_rate,
            large_transfer_threshold = %thresholds.large_transfer_threshold,
            "Setting rate control"
        );

        self.workflow
            .execute(&TxIntent::SetRateControlThreshold {
                bridge: self.plan.bridge,
                token: token.address,
                capacity: thresholds.capacity,
                refill_rate: thresholds.refill_rate,
                large_transfer_threshold: thresholds.large_transfer_threshold,
            })
            .await?;

        Ok(self.advance(ThresholdsSet(token)))
    }
}

impl<B: ChainBackend> Preparation<B, ThresholdsSet> {
    /// Revoke the rate-control role from the deployer.
    pub async fn revoke_rate_role(self) -> PrepareResult<Preparation<B, RateRoleRevoked>> {
        let ThresholdsSet(token) = self.state;
        let deployer = self.workflow.sender();
        tracing::info!(role = %self.plan.rate_role, account = %deployer, "Revoking rate-control role");

        self.workflow
            .execute(&TxIntent::RevokeRole {
                bridge: self.plan.bridge,
                role: self.plan.rate_role,
                account: deployer,
            })
            .await?;

        Ok(self.advance(RateRoleRevoked(token)))
    }
}

impl<B: ChainBackend> Preparation<B, RateRoleRevoked> {
    /// Revoke DEFAULT_ADMIN_ROLE from the deployer.
    pub async fn revoke_admin_role(self) -> PrepareResult<Preparation<B, AdminRoleRevoked>> {
        let RateRoleRevoked(token) = self.state;
        let deployer = self.workflow.sender();
        let admin_role = self
            .workflow
            .read(self.plan.bridge, IRootERC20BridgeFlowRate::DEFAULT_ADMIN_ROLECall {})
            .await?;
        tracing::info!(role = %admin_role, account = %deployer, "Revoking admin role");

        self.workflow
            .execute(&TxIntent::RevokeRole {
                bridge: self.plan.bridge,
                role: admin_role,
                account: deployer,
            })
            .await?;

        Ok(self.advance(AdminRoleRevoked { token, admin_role }))
    }
}

impl<B: ChainBackend> Preparation<B, AdminRoleRevoked> {
    /// Query final role membership of the multisig and the deployer.
    pub async fn summarize(self) -> PrepareResult<PreparationSummary> {
        let AdminRoleRevoked { token, admin_role } = self.state;
        let bridge = self.plan.bridge;
        let deployer = self.workflow.sender();
        let multisig = self.plan.multisig;
        let rate_role = self.plan.rate_role;

        let workflow = &self.workflow;
        let summary = PreparationSummary {
            token: token.address,
            token_deployed: token.deployed,
            deployer,
            multisig,
            multisig_has_admin: has_role(workflow, bridge, admin_role, multisig).await?,
            deployer_has_admin: has_role(workflow, bridge, admin_role, deployer).await?,
            multisig_has_rate: has_role(workflow, bridge, rate_role, multisig).await?,
            deployer_has_rate: has_role(workflow, bridge, rate_role, deployer).await?,
        };

        if summary.handed_over() {
            tracing::info!("Bridge administration handed over to multisig");
        } else {
            tracing::warn!(
                multisig_has_admin = summary.multisig_has_admin,
                multisig_has_rate = summary.multisig_has_rate,
                deployer_has_admin = summary.deployer_has_admin,
                deployer_has_rate = summary.deployer_has_rate,
                "Role handover incomplete"
            );
        }

        Ok(summary)
    }
}

async fn has_role<B: ChainBackend>(
    workflow: &TxWorkflow<B>,
    bridge: Address,
    role: B256,
    account: Address,
) -> PrepareResult<bool> {
    let member = workflow
        .read(bridge, IRootERC20BridgeFlowRate::hasRoleCall { role, account })
        .await?;
    Ok(member)
}
