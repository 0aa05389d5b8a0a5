use crate::models::error::ModelStoreError;
use crate::types::location::Location;
use crate::types::parameter::Parameter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Location {0} is not configured")]
    UnknownLocation(Location),

    #[error("Failed to load the {parameter} model for {location}")]
    ArtifactLoad {
        location: Location,
        parameter: Parameter,
        #[source]
        source: ModelStoreError,
    },

    // Covers errors joining the blocking artifact load
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
