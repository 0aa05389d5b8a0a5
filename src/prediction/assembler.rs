//! Turns raw parameter predictions into display-ready reports.

use crate::catalog::profile::LocationProfile;
use crate::prediction::engine::{DailyPrediction, ParameterPredictions};
use crate::prediction::error::PredictionError;
use crate::types::report::{PredictionRecord, PredictionReport, ReportKind};
use chrono::NaiveDate;

fn to_records(
    profile: &LocationProfile,
    date: NaiveDate,
    predictions: &ParameterPredictions,
    stamp_location: bool,
) -> Result<Vec<PredictionRecord>, PredictionError> {
    let location = profile.location();
    predictions
        .iter()
        .map(|(parameter, value)| {
            let name = profile
                .display_name(parameter)
                .ok_or(PredictionError::UnmappedParameter {
                    location,
                    parameter,
                })?;
            Ok(PredictionRecord {
                parameter: name.to_string(),
                value,
                date,
                location: stamp_location.then_some(location),
            })
        })
        .collect()
}

/// Builds the single-day report for `date`.
///
/// Records follow the order of `predictions` and are stamped with the profile's location.
///
/// # Errors
///
/// Returns [`PredictionError::UnmappedParameter`] if a predicted parameter has
/// no display name in `profile`.
pub fn assemble_daily(
    profile: &LocationProfile,
    date: NaiveDate,
    predictions: &ParameterPredictions,
) -> Result<PredictionReport, PredictionError> {
    let records = to_records(profile, date, predictions, true)?;
    Ok(PredictionReport::new(
        ReportKind::Daily,
        profile.location(),
        date,
        records,
    ))
}

/// Builds the multi-day report: ordered by date, then by parameter order within each date.
///
/// Days are sorted by date (stably) before assembly, so callers need not pre-sort.
/// An empty `days` slice yields an empty report starting at `NaiveDate::MIN`.
///
/// # Errors
///
/// Returns [`PredictionError::UnmappedParameter`] if a predicted parameter has
/// no display name in `profile`.
pub fn assemble_weekly(
    profile: &LocationProfile,
    days: &[DailyPrediction],
) -> Result<PredictionReport, PredictionError> {
    let mut ordered: Vec<&DailyPrediction> = days.iter().collect();
    ordered.sort_by_key(|day| day.date);

    let mut records = Vec::with_capacity(days.len() * profile.targets().len());
    for day in &ordered {
        records.extend(to_records(profile, day.date, &day.predictions, false)?);
    }
    let start = ordered.first().map_or(NaiveDate::MIN, |day| day.date);
    Ok(PredictionReport::new(
        ReportKind::Weekly,
        profile.location(),
        start,
        records,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::profile::Catalog;
    use crate::types::feature_vector::FeatureVector;
    use crate::types::location::Location;
    use crate::types::parameter::Parameter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn predictions(offset: f64) -> ParameterPredictions {
        ParameterPredictions::new(
            Parameter::ALL
                .into_iter()
                .enumerate()
                .map(|(i, p)| (p, offset + i as f64))
                .collect(),
        )
    }

    fn day(d: NaiveDate) -> DailyPrediction {
        DailyPrediction {
            date: d,
            features: FeatureVector::derive(d),
            predictions: predictions(f64::from(FeatureVector::derive(d).day()) * 100.0),
        }
    }

    #[test]
    fn test_daily_report_translates_and_stamps() -> Result<(), PredictionError> {
        let catalog = Catalog::builtin();
        let profile = catalog.profile(Location::Nsukka).unwrap();
        let report = assemble_daily(profile, date(2021, 1, 1), &predictions(0.0))?;

        assert_eq!(report.kind(), ReportKind::Daily);
        assert_eq!(report.location(), Location::Nsukka);
        assert_eq!(report.len(), Parameter::ALL.len());
        let first = &report.records()[0];
        assert_eq!(first.parameter, "Air Temperature (°C)");
        assert_eq!(first.value, 0.0);
        assert_eq!(first.date.to_string(), "2021-01-01");
        assert_eq!(first.location, Some(Location::Nsukka));
        assert_eq!(report.records()[8].parameter, "Soil Moisture (m³/m³)");
        Ok(())
    }

    #[test]
    fn test_unmapped_parameter_is_an_error() {
        let profile = LocationProfile::new(Location::Ayingba)
            .with_target(Parameter::AirTemperature, "AirTemp_Avg")
            .with_display_name(Parameter::AirTemperature, "Air Temperature (°C)");
        let predictions = ParameterPredictions::new(vec![
            (Parameter::AirTemperature, 31.0),
            (Parameter::WindDirection, 220.0),
        ]);
        let result = assemble_daily(&profile, date(2023, 3, 1), &predictions);
        assert!(matches!(
            result,
            Err(PredictionError::UnmappedParameter {
                location: Location::Ayingba,
                parameter: Parameter::WindDirection,
            })
        ));
    }

    #[test]
    fn test_weekly_report_is_date_major_parameter_minor() -> Result<(), PredictionError> {
        let catalog = Catalog::builtin();
        let profile = catalog.profile(Location::Ayingba).unwrap();
        // Deliberately out of order.
        let days: Vec<_> = [3, 1, 7, 2, 5, 4, 6]
            .into_iter()
            .map(|d| day(date(2024, 6, d)))
            .collect();

        let report = assemble_weekly(profile, &days)?;
        assert_eq!(report.kind(), ReportKind::Weekly);
        assert_eq!(report.len(), 7 * profile.targets().len());
        assert_eq!(report.start_date(), date(2024, 6, 1));
        assert_eq!(
            report.dates(),
            (1..=7).map(|d| date(2024, 6, d)).collect::<Vec<_>>()
        );

        for (i, record) in report.records().iter().enumerate() {
            let day_index = i / Parameter::ALL.len();
            let parameter_index = i % Parameter::ALL.len();
            assert_eq!(record.date, date(2024, 6, day_index as u32 + 1));
            assert_eq!(
                Some(record.parameter.as_str()),
                profile.display_name(Parameter::ALL[parameter_index])
            );
            assert_eq!(record.location, None);
        }
        let june_third: Vec<_> = report.records_for(date(2024, 6, 3)).collect();
        assert_eq!(june_third.len(), 9);
        assert_eq!(june_third[0].value, 300.0);
        Ok(())
    }

    #[test]
    fn test_weekly_report_of_no_days_is_empty() -> Result<(), PredictionError> {
        let catalog = Catalog::builtin();
        let report = assemble_weekly(catalog.profile(Location::Nsukka).unwrap(), &[])?;
        assert!(report.is_empty());
        Ok(())
    }
}
