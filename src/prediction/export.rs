//! CSV export of prediction reports, for download by the presentation layer.

use crate::prediction::error::ExportError;
use crate::types::location::Location;
use crate::types::report::{PredictionRecord, PredictionReport};
use chrono::NaiveDate;
use polars::prelude::*;
use std::io::Cursor;

/// File name offered for a downloaded report.
pub const CSV_FILE_NAME: &str = "prediction.csv";
/// MIME type of [`report_to_csv`] output.
pub const CSV_MIME_TYPE: &str = "text/csv";

const COLUMN_PARAMETER: &str = "Weather Parameter";
const COLUMN_VALUE: &str = "Predicted Value";
const COLUMN_DATE: &str = "Date";
const COLUMN_LOCATION: &str = "Location";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a report into a Polars `DataFrame` with one row per record.
///
/// The `Location` column is only present when every record carries a location,
/// which is the case for single-day reports.
pub fn report_to_frame(report: &PredictionReport) -> Result<DataFrame, ExportError> {
    let records = report.records();
    let parameters: Vec<&str> = records.iter().map(|r| r.parameter.as_str()).collect();
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();
    let dates: Vec<String> = records
        .iter()
        .map(|r| r.date.format(DATE_FORMAT).to_string())
        .collect();

    let mut frame = df!(
        COLUMN_PARAMETER => parameters,
        COLUMN_VALUE => values,
        COLUMN_DATE => dates
    )?;

    let locations: Option<Vec<&str>> = records
        .iter()
        .map(|r| r.location.map(|l| l.as_str()))
        .collect();
    if let Some(locations) = locations.filter(|l| !l.is_empty()) {
        frame.with_column(Column::new(COLUMN_LOCATION.into(), locations))?;
    }
    Ok(frame)
}

/// Serializes `report` to CSV with a header row.
///
/// Columns are `Weather Parameter, Predicted Value, Date` and, for single-day
/// reports, `Location`. Dates are written as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```no_run
/// # use hyperlocal_weather::{report_to_csv, PredictionReport, ExportError};
/// # fn run(report: &PredictionReport) -> Result<(), ExportError> {
/// let csv = report_to_csv(report)?;
/// std::fs::write(hyperlocal_weather::CSV_FILE_NAME, csv).unwrap();
/// # Ok(())
/// # }
/// ```
pub fn report_to_csv(report: &PredictionReport) -> Result<Vec<u8>, ExportError> {
    let mut frame = report_to_frame(report)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)?;
    Ok(buffer)
}

/// Parses CSV produced by [`report_to_csv`] back into records.
///
/// # Errors
///
/// Returns [`ExportError::ColumnNotFound`] if a required column is missing, and
/// [`ExportError::MissingValue`], [`ExportError::InvalidDate`] or
/// [`ExportError::InvalidLocation`] for malformed cells.
pub fn records_from_csv(bytes: &[u8]) -> Result<Vec<PredictionRecord>, ExportError> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;

    // Helper macro to get a column or return ColumnNotFound error
    macro_rules! get_column {
        ($df:expr, $name:expr) => {
            $df.column($name)
                .map_err(|e| ExportError::ColumnNotFound($name.to_string(), e))?
        };
    }

    let parameter_column = get_column!(frame, COLUMN_PARAMETER).str()?;
    let value_column = get_column!(frame, COLUMN_VALUE).cast(&DataType::Float64)?;
    let value_column = value_column.f64()?;
    let date_column = get_column!(frame, COLUMN_DATE).cast(&DataType::String)?;
    let date_column = date_column.str()?;
    let location_column = match frame.column(COLUMN_LOCATION) {
        Ok(column) => Some(column.str()?),
        Err(_) => None,
    };

    let missing = |column: &str, row: usize| ExportError::MissingValue {
        column: column.to_string(),
        row,
    };

    (0..frame.height())
        .map(|row| {
            let parameter = parameter_column
                .get(row)
                .ok_or_else(|| missing(COLUMN_PARAMETER, row))?;
            let value = value_column
                .get(row)
                .ok_or_else(|| missing(COLUMN_VALUE, row))?;
            let date_text = date_column
                .get(row)
                .ok_or_else(|| missing(COLUMN_DATE, row))?;
            let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|source| {
                ExportError::InvalidDate {
                    value: date_text.to_string(),
                    row,
                    source,
                }
            })?;
            let location = match location_column {
                Some(column) => {
                    let text = column.get(row).ok_or_else(|| missing(COLUMN_LOCATION, row))?;
                    Some(
                        text.parse::<Location>()
                            .map_err(|_| ExportError::InvalidLocation {
                                value: text.to_string(),
                                row,
                            })?,
                    )
                }
                None => None,
            };
            Ok(PredictionRecord {
                parameter: parameter.to_string(),
                value,
                date,
                location,
            })
        })
        .collect()
}
