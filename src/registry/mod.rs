//! Deployment registry.
//!
//! A JSON object mapping logical contract names to addresses, shared with the
//! other bootstrap scripts:
//!
//! ```json
//! { "ROOT_BRIDGE_ADDRESS": "0x...", "ROOT_TEST_CUSTOM_TOKEN": "" }
//! ```
//!
//! # Design Decisions
//! - Read once at startup, rewritten after each new deployment
//! - Empty, malformed, and zero addresses all read as "not deployed"
//! - Unknown keys are preserved on rewrite
//! - Writes go to a temp file first and are renamed into place

use alloy::primitives::Address;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Registry {} is not a JSON object of strings: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A contract that must already exist has no usable address.
    #[error("Registry {} has no address for {name}", .path.display())]
    Missing { path: PathBuf, name: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Deployed contract addresses keyed by logical name.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl ContractRegistry {
    /// Load the registry at `path`. A missing file is an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> RegistryResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| RegistryError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Registry not found, starting empty");
                BTreeMap::new()
            }
            Err(source) => return Err(RegistryError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Registry loaded");
        Ok(Self { path, entries })
    }

    /// Raw recorded value for `name`, if any.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Usable address recorded for `name`.
    pub fn address(&self, name: &str) -> Option<Address> {
        let raw = self.raw(name)?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<Address>() {
            Ok(address) if address.is_zero() => None,
            Ok(address) => Some(address),
            Err(e) => {
                tracing::warn!(name, value = raw, error = %e, "Ignoring malformed registry address");
                None
            }
        }
    }

    /// Address for `name`, or [`RegistryError::Missing`].
    pub fn require_address(&self, name: &str) -> RegistryResult<Address> {
        self.address(name).ok_or_else(|| RegistryError::Missing {
            path: self.path.clone(),
            name: name.to_string(),
        })
    }

    /// Record `address` under `name` and persist the registry.
    pub fn record(&mut self, name: &str, address: Address) -> RegistryResult<()> {
        self.entries.insert(name.to_string(), address.to_string());
        self.save()?;
        tracing::info!(name, address = %address, path = %self.path.display(), "Registry updated");
        Ok(())
    }

    fn save(&self) -> RegistryResult<()> {
        let io_err = |source| RegistryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut content =
            serde_json::to_string_pretty(&self.entries).map_err(|source| RegistryError::Json {
                path: self.path.clone(),
                source,
            })?;
        content.push('\n');

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}
