//! Test preparation sequence.
//!
//! # Data Flow
//! ```text
//! EnvConfig + PrepareConfig + ContractRegistry
//!     → plan.rs (PreparationPlan, no network)
//!     → pipeline.rs (typed stages, one confirmed transaction per step)
//!     → summary.rs (role membership report)
//! ```
//!
//! # Design Decisions
//! - Strict order; each stage is reachable only from the previous one
//! - No rollback: mined transactions are final
//! - Token deployment is idempotent across reruns, mint and revocations are not

pub mod pipeline;
pub mod plan;
pub mod summary;

pub use pipeline::{Preparation, Resolved};
pub use plan::PreparationPlan;
pub use summary::PreparationSummary;

use tokio::io::AsyncBufRead;

use crate::blockchain::ChainBackend;
use crate::error::PrepareResult;
use crate::lifecycle::ConfirmationGate;

/// Drive a resolved run through every remaining stage.
pub async fn run<B, R>(
    preparation: Preparation<B, Resolved>,
    gate: ConfirmationGate<R>,
) -> PrepareResult<PreparationSummary>
where
    B: ChainBackend,
    R: AsyncBufRead + Unpin,
{
    preparation
        .await_confirmation(gate)
        .await?
        .ensure_token_deployed()
        .await?
        .mint()
        .await?
        .set_rate_thresholds()
        .await?
        .revoke_rate_role()
        .await?
        .revoke_admin_role()
        .await?
        .summarize()
        .await
}
