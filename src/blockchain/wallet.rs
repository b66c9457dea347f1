//! Deployer and test-account signers.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//! - Hardware signing requires the `ledger` feature

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

#[cfg(feature = "ledger")]
use alloy::signers::ledger::{HDPath, LedgerSigner};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::DeployerCredential;

/// Parse a hex-encoded private key (with or without 0x prefix).
pub fn parse_private_key(private_key_hex: &str) -> BlockchainResult<PrivateKeySigner> {
    let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

    key_hex
        .parse()
        .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))
}

/// Signing identity of the deployer, selected once at startup.
pub enum DeployerSigner {
    /// Raw private key held in memory.
    Local(PrivateKeySigner),
    /// Ledger device account.
    #[cfg(feature = "ledger")]
    Ledger(LedgerSigner),
}

impl DeployerSigner {
    /// Build the signer described by `credential` for EIP-155 `chain_id`.
    ///
    /// For a ledger this opens the device and reads the account address.
    pub async fn from_credential(
        credential: &DeployerCredential,
        chain_id: u64,
    ) -> BlockchainResult<Self> {
        let signer = match credential {
            DeployerCredential::PrivateKey(key) => {
                let signer = parse_private_key(key)?.with_chain_id(Some(chain_id));
                Self::Local(signer)
            }
            DeployerCredential::Ledger { index } => Self::ledger(*index, chain_id).await?,
        };

        tracing::info!(
            address = %signer.address(),
            kind = signer.kind(),
            chain_id,
            "Deployer signer initialized"
        );

        Ok(signer)
    }

    #[cfg(feature = "ledger")]
    async fn ledger(index: usize, chain_id: u64) -> BlockchainResult<Self> {
        // LedgerLive(i) is m/44'/60'/{i}'/0/0.
        let signer = LedgerSigner::new(HDPath::LedgerLive(index), Some(chain_id))
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Ledger unavailable: {}", e)))?;
        Ok(Self::Ledger(signer))
    }

    #[cfg(not(feature = "ledger"))]
    async fn ledger(index: usize, _chain_id: u64) -> BlockchainResult<Self> {
        Err(BlockchainError::Wallet(format!(
            "Ledger account {} requested but this build lacks the `ledger` feature",
            index
        )))
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        match self {
            Self::Local(signer) => signer.address(),
            #[cfg(feature = "ledger")]
            Self::Ledger(signer) => signer.address(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "private-key",
            #[cfg(feature = "ledger")]
            Self::Ledger(_) => "ledger",
        }
    }

    /// Wrap into the wallet type the RPC provider signs with.
    pub fn into_wallet(self) -> EthereumWallet {
        match self {
            Self::Local(signer) => EthereumWallet::from(signer),
            #[cfg(feature = "ledger")]
            Self::Ledger(signer) => EthereumWallet::from(signer),
        }
    }
}

impl std::fmt::Debug for DeployerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployerSigner")
            .field("kind", &self.kind())
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_private_key() {
        let signer = parse_private_key(TEST_PRIVATE_KEY).unwrap();
        // This is the corresponding address for the test key
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_parse_private_key_with_0x_prefix() {
        let signer = parse_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = parse_private_key("invalid_key");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_local_deployer_signer() {
        let credential = DeployerCredential::PrivateKey(TEST_PRIVATE_KEY.to_string());
        let signer = DeployerSigner::from_credential(&credential, 31337).await.unwrap();

        assert_eq!(signer.kind(), "private-key");
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains(TEST_PRIVATE_KEY));

        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[cfg(not(feature = "ledger"))]
    #[tokio::test]
    async fn test_ledger_requires_feature() {
        let credential = DeployerCredential::Ledger { index: 0 };
        let err = DeployerSigner::from_credential(&credential, 1).await.unwrap_err();
        assert!(err.to_string().contains("`ledger` feature"));
    }
}
