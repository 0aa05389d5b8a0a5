//! Display-ready prediction records and reports.

use crate::types::location::Location;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a report covers a single day or a multi-day horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    Daily,
    Weekly,
}

/// One predicted value, ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Location-specific display name including the unit, e.g. "Air Temperature (°C)".
    pub parameter: String,
    /// The regressor's point prediction.
    pub value: f64,
    /// The date the prediction is for. Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Set on single-day reports only.
    pub location: Option<Location>,
}

/// An ordered set of [`PredictionRecord`]s produced for one location.
///
/// Daily reports hold one record per target parameter, in the location's
/// canonical parameter order. Weekly reports are ordered by date first and by
/// canonical parameter order within each date.
///
/// Reports are immutable once assembled; use [`crate::assemble_daily`] or
/// [`crate::assemble_weekly`] to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    kind: ReportKind,
    location: Location,
    start_date: NaiveDate,
    records: Vec<PredictionRecord>,
}

impl PredictionReport {
    pub(crate) fn new(
        kind: ReportKind,
        location: Location,
        start_date: NaiveDate,
        records: Vec<PredictionRecord>,
    ) -> Self {
        Self {
            kind,
            location,
            start_date,
            records,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// The first date covered by the report.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct dates covered, in report order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = Vec::new();
        for record in &self.records {
            if dates.last() != Some(&record.date) {
                dates.push(record.date);
            }
        }
        dates
    }

    /// All records for `date`, in canonical parameter order.
    pub fn records_for(&self, date: NaiveDate) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter().filter(move |r| r.date == date)
    }

    /// Serializes the report to CSV. See [`crate::report_to_csv`].
    pub fn to_csv(&self) -> Result<Vec<u8>, crate::ExportError> {
        crate::prediction::export::report_to_csv(self)
    }
}
