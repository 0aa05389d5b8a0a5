use crate::types::location::Location;
use crate::types::parameter::Parameter;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("No station profile configured for location {0}")]
    MissingProfile(Location),

    #[error("Station profile for {0} has no target parameters")]
    EmptyTargets(Location),

    #[error("Parameter {parameter} is listed twice for location {location}")]
    DuplicateTarget {
        location: Location,
        parameter: Parameter,
    },

    #[error("Parameter {parameter} has no display name for location {location}")]
    UnmappedParameter {
        location: Location,
        parameter: Parameter,
    },

    #[error("Parameter {parameter} has an empty artifact key for location {location}")]
    EmptyArtifactKey {
        location: Location,
        parameter: Parameter,
    },
}
