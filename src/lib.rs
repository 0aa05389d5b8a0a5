mod catalog;
mod config;
mod error;
mod forecaster;
mod models;
mod prediction;
mod registry;
mod session;
mod types;
mod utils;

pub use config::ForecastConfig;
pub use error::ForecastError;
pub use forecaster::Forecaster;

pub use types::feature_vector::*;
pub use types::location::*;
pub use types::parameter::Parameter;
pub use types::report::*;

pub use catalog::profile::*;
pub use models::artifact::*;
pub use models::regressor::Regressor;
pub use models::store::*;
pub use registry::model_registry::ModelRegistry;
pub use registry::registry_cache::RegistryCache;

pub use prediction::assembler::*;
pub use prediction::engine::*;
pub use prediction::export::*;

pub use session::identity::*;
pub use session::machine::SessionClient;
pub use session::state::*;

pub use catalog::error::CatalogError;
pub use models::error::{InferenceFailure, ModelStoreError};
pub use prediction::error::{ExportError, PredictionError};
pub use registry::error::RegistryError;
pub use session::error::{AuthError, InvalidHistoryIndex, SessionError};
