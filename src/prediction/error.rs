use crate::models::error::InferenceFailure;
use crate::types::location::Location;
use crate::types::parameter::Parameter;
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("The {parameter} model for {location} failed")]
    Inference {
        location: Location,
        parameter: Parameter,
        #[source]
        source: InferenceFailure,
    },

    #[error("Parameter {parameter} has no display name for location {location}")]
    UnmappedParameter {
        location: Location,
        parameter: Parameter,
    },

    #[error("A {num_days}-day horizon starting {start} runs past the last supported date")]
    HorizonOutOfRange { start: NaiveDate, num_days: u32 },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Required column '{0}' not found in CSV data")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Invalid date '{value}' at row {row}")]
    InvalidDate {
        value: String,
        row: usize,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid location '{value}' at row {row}")]
    InvalidLocation { value: String, row: usize },
}
