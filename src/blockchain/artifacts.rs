//! Compiled contract artifacts.
//!
//! Looks up `<dir>/<Name>.sol/<Name>.json` (Foundry/Hardhat layout) and then
//! `<dir>/<Name>.json`. The creation bytecode is read from either
//! `"bytecode": "0x.."` or `"bytecode": { "object": "0x.." }`.

use alloy::primitives::Bytes;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("No artifact for {contract}; looked in {}", display_paths(.searched))]
    NotFound {
        contract: String,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact {} has no creation bytecode", .path.display())]
    MissingBytecode { path: PathBuf },

    #[error("Artifact {} has invalid bytecode: {reason}", .path.display())]
    InvalidBytecode { path: PathBuf, reason: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Candidate artifact paths for `contract`, in lookup order.
pub fn artifact_paths(dir: &Path, contract: &str) -> Vec<PathBuf> {
    vec![
        dir.join(format!("{contract}.sol")).join(format!("{contract}.json")),
        dir.join(format!("{contract}.json")),
    ]
}

/// Load the creation bytecode of `contract` from `dir`.
pub fn load_creation_bytecode(dir: &Path, contract: &str) -> ArtifactResult<Bytes> {
    let searched = artifact_paths(dir, contract);
    let path = searched
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ArtifactError::NotFound {
            contract: contract.to_string(),
            searched: searched.clone(),
        })?;

    let content = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    let artifact: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;

    let hex = match &artifact["bytecode"] {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(obj) => match obj.get("object") {
            Some(serde_json::Value::String(s)) => s.as_str(),
            _ => return Err(ArtifactError::MissingBytecode { path }),
        },
        _ => return Err(ArtifactError::MissingBytecode { path }),
    };

    let bytecode: Bytes = hex.parse().map_err(|e| ArtifactError::InvalidBytecode {
        path: path.clone(),
        reason: format!("{}", e),
    })?;
    if bytecode.is_empty() {
        // Interfaces and abstract contracts compile to empty bytecode.
        return Err(ArtifactError::InvalidBytecode {
            path,
            reason: "bytecode is empty".to_string(),
        });
    }

    tracing::debug!(contract, path = %path.display(), size = bytecode.len(), "Loaded artifact");
    Ok(bytecode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_foundry_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Token.sol/Token.json",
            r#"{"abi": [], "bytecode": {"object": "0x6080604052", "linkReferences": {}}}"#,
        );

        let code = load_creation_bytecode(dir.path(), "Token").unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_hardhat_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Token.json", r#"{"contractName": "Token", "bytecode": "0x6001"}"#);

        let code = load_creation_bytecode(dir.path(), "Token").unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x01]);
    }

    #[test]
    fn test_missing_artifact_lists_paths() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_creation_bytecode(dir.path(), "Token").unwrap_err();
        match &err {
            ArtifactError::NotFound { searched, .. } => assert_eq!(searched.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Token.sol"));
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "IToken.json", r#"{"bytecode": "0x"}"#);

        assert!(matches!(
            load_creation_bytecode(dir.path(), "IToken"),
            Err(ArtifactError::InvalidBytecode { .. })
        ));
    }

    #[test]
    fn test_missing_bytecode_field() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Token.json", r#"{"abi": []}"#);

        assert!(matches!(
            load_creation_bytecode(dir.path(), "Token"),
            Err(ArtifactError::MissingBytecode { .. })
        ));
    }
}
