//! Final role-membership report.

use alloy::primitives::Address;
use std::fmt;

/// Outcome of a completed preparation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparationSummary {
    pub token: Address,
    /// `false` when an existing token was reused.
    pub token_deployed: bool,
    pub deployer: Address,
    pub multisig: Address,
    pub multisig_has_admin: bool,
    pub deployer_has_admin: bool,
    pub multisig_has_rate: bool,
    pub deployer_has_rate: bool,
}

impl PreparationSummary {
    /// The multisig holds both roles and the deployer holds neither.
    pub fn handed_over(&self) -> bool {
        self.multisig_has_admin
            && self.multisig_has_rate
            && !self.deployer_has_admin
            && !self.deployer_has_rate
    }
}

impl fmt::Display for PreparationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = if self.token_deployed { "deployed" } else { "reused" };
        writeln!(f, "Test token ({}): {}", origin, self.token)?;
        writeln!(f, "Does multisig have DEFAULT_ADMIN: {}", self.multisig_has_admin)?;
        writeln!(f, "Does deployer have DEFAULT_ADMIN: {}", self.deployer_has_admin)?;
        writeln!(f, "Does multisig have RATE_ADMIN: {}", self.multisig_has_rate)?;
        write!(f, "Does deployer have RATE_ADMIN: {}", self.deployer_has_rate)
    }
}
