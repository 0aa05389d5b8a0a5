use crate::catalog::error::CatalogError;
use crate::prediction::error::{ExportError, PredictionError};
use crate::registry::error::RegistryError;
use crate::session::error::SessionError;
use crate::types::location::ParseLocationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    ParseLocation(#[from] ParseLocationError),

    #[error("Failed to determine model directory")]
    ModelDirResolution(#[source] std::io::Error),

    #[error("Cannot access model directory '{0}'")]
    ModelDir(PathBuf, #[source] std::io::Error),

    #[error("Model path '{0}' is not a directory")]
    ModelDirNotADirectory(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
