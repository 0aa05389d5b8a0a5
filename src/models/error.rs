use crate::types::location::Location;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("No model artifact for '{artifact_key}' at location {location} (looked in '{searched}')")]
    NotFound {
        location: Location,
        artifact_key: String,
        searched: PathBuf,
    },

    #[error("Failed to read model artifact '{0}'")]
    ArtifactRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write model artifact '{0}'")]
    ArtifactWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode model artifact '{0}'")]
    BincodeDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode model artifact")]
    BincodeEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to parse JSON model artifact '{0}'")]
    JsonParse(PathBuf, #[source] serde_json::Error),
}

/// Why a regressor could not produce a value for a feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceFailure {
    #[error("Model expects {expected} features, got {found}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("Model contains no trees")]
    EmptyEnsemble,

    #[error("Tree {tree} references missing node {node}")]
    NodeOutOfBounds { tree: usize, node: usize },

    #[error("Tree {tree} splits on feature {feature}, which does not exist")]
    FeatureOutOfBounds { tree: usize, feature: usize },

    #[error("Tree {tree} does not reach a leaf")]
    UnterminatedTree { tree: usize },

    #[error("Model produced a non-finite value ({0})")]
    NonFinite(f64),

    #[error("{0}")]
    Other(String),
}
