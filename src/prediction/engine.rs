//! Runs every model of a registry on calendar feature vectors.

use crate::models::error::InferenceFailure;
use crate::models::regressor::Regressor;
use crate::prediction::error::PredictionError;
use crate::registry::model_registry::ModelRegistry;
use crate::types::feature_vector::FeatureVector;
use crate::types::parameter::Parameter;
use chrono::{Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Number of days covered by a weekly forecast.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Raw predicted values for one date, in the registry's canonical parameter order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterPredictions {
    values: Vec<(Parameter, f64)>,
}

impl ParameterPredictions {
    pub fn new(values: Vec<(Parameter, f64)>) -> Self {
        Self { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, v)| *v)
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.values.iter().map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The predictions for one day of a multi-day run. Only built by
/// [`predict_range`], so `features` always belong to `date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPrediction {
    pub date: NaiveDate,
    pub features: FeatureVector,
    pub predictions: ParameterPredictions,
}

/// Applies `features` to every model in `registry`.
///
/// The result contains exactly the registry's parameters, in its order.
///
/// # Errors
///
/// Returns [`PredictionError::Inference`] for the first model that fails or
/// yields a non-finite value. No partial result is returned.
pub fn predict_one(
    registry: &ModelRegistry,
    features: &FeatureVector,
) -> Result<ParameterPredictions, PredictionError> {
    let input = features.as_array();
    let values = registry
        .iter()
        .map(|(parameter, model)| {
            model
                .predict(&input)
                .and_then(|value| {
                    if value.is_finite() {
                        Ok(value)
                    } else {
                        Err(InferenceFailure::NonFinite(value))
                    }
                })
                .map(|value| (parameter, value))
                .map_err(|source| PredictionError::Inference {
                    location: registry.location(),
                    parameter,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Predicted {} parameters for {} at {}",
        values.len(),
        registry.location(),
        features
    );
    Ok(ParameterPredictions::new(values))
}

/// Predicts `num_days` consecutive days starting at `start`, in date order.
///
/// # Errors
///
/// * [`PredictionError::HorizonOutOfRange`] if the last day lies beyond the
///   supported calendar.
/// * The first [`PredictionError::Inference`] of any day.
pub fn predict_range(
    registry: &ModelRegistry,
    start: NaiveDate,
    num_days: u32,
) -> Result<Vec<DailyPrediction>, PredictionError> {
    if num_days > 0
        && start
            .checked_add_days(Days::new(u64::from(num_days) - 1))
            .is_none()
    {
        return Err(PredictionError::HorizonOutOfRange { start, num_days });
    }
    start
        .iter_days()
        .take(num_days as usize)
        .map(|date| {
            let features = FeatureVector::derive(date);
            predict_one(registry, &features).map(|predictions| DailyPrediction {
                date,
                features,
                predictions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::profile::Catalog;
    use crate::models::artifact::{LinearModel, ModelArtifact};
    use crate::types::location::Location;
    use std::sync::Arc;

    /// Returns `scale * day_of_month`.
    fn by_day(scale: f64) -> Arc<dyn Regressor> {
        Arc::new(ModelArtifact::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![0.0, 0.0, scale, 0.0, 0.0, 0.0],
        }))
    }

    #[derive(Debug)]
    struct Broken;

    impl Regressor for Broken {
        fn predict(&self, _features: &[f64]) -> Result<f64, InferenceFailure> {
            Err(InferenceFailure::Other("corrupted model".to_string()))
        }
    }

    #[derive(Debug)]
    struct NotANumber;

    impl Regressor for NotANumber {
        fn predict(&self, _features: &[f64]) -> Result<f64, InferenceFailure> {
            Ok(f64::NAN)
        }
    }

    fn registry_for(location: Location) -> ModelRegistry {
        let catalog = Catalog::builtin();
        let models = catalog
            .profile(location)
            .unwrap()
            .parameters()
            .enumerate()
            .map(|(i, p)| (p, by_day(i as f64 + 1.0)))
            .collect();
        ModelRegistry::from_models(location, models)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_predict_one_covers_exactly_the_targets_in_order() -> Result<(), PredictionError> {
        for location in Location::ALL {
            let registry = registry_for(location);
            let predictions = predict_one(&registry, &FeatureVector::derive(date(2021, 1, 3)))?;
            assert_eq!(
                predictions.parameters().collect::<Vec<_>>(),
                Parameter::ALL.to_vec()
            );
            assert_eq!(predictions.get(Parameter::AirTemperature), Some(3.0));
            assert_eq!(predictions.get(Parameter::SoilMoisture), Some(27.0));
        }
        Ok(())
    }

    #[test]
    fn test_predict_one_fails_whole_call_on_model_error() {
        let models: Vec<(Parameter, Arc<dyn Regressor>)> = vec![
            (Parameter::AirTemperature, by_day(1.0)),
            (Parameter::WindSpeed, Arc::new(Broken)),
            (Parameter::Rainfall, by_day(1.0)),
        ];
        let registry = ModelRegistry::from_models(Location::Ayingba, models);
        let result = predict_one(&registry, &FeatureVector::derive(date(2022, 5, 5)));
        match result {
            Err(PredictionError::Inference {
                location,
                parameter,
                source,
            }) => {
                assert_eq!(location, Location::Ayingba);
                assert_eq!(parameter, Parameter::WindSpeed);
                assert_eq!(source, InferenceFailure::Other("corrupted model".to_string()));
            }
            other => panic!("expected an inference error, got {:?}", other),
        }
    }

    #[test]
    fn test_predict_one_rejects_non_finite_output() {
        let models: Vec<(Parameter, Arc<dyn Regressor>)> =
            vec![(Parameter::SolarRadiation, Arc::new(NotANumber))];
        let registry = ModelRegistry::from_models(Location::Nsukka, models);
        let result = predict_one(&registry, &FeatureVector::derive(date(2022, 5, 5)));
        assert!(matches!(
            result,
            Err(PredictionError::Inference {
                parameter: Parameter::SolarRadiation,
                source: InferenceFailure::NonFinite(_),
                ..
            })
        ));
    }

    #[test]
    fn test_predict_range_is_day_ordered() -> Result<(), PredictionError> {
        let registry = registry_for(Location::Nsukka);
        let days = predict_range(&registry, date(2021, 12, 29), DEFAULT_HORIZON_DAYS)?;

        assert_eq!(days.len(), 7);
        let dates: Vec<_> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates.first(), Some(&date(2021, 12, 29)));
        assert_eq!(dates.last(), Some(&date(2022, 1, 4)));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));

        for day in &days {
            assert_eq!(day.features, FeatureVector::derive(day.date));
            assert_eq!(
                day.predictions.get(Parameter::AirTemperature),
                Some(f64::from(day.features.day()))
            );
        }
        Ok(())
    }

    #[test]
    fn test_predict_range_past_calendar_end_is_an_error() -> Result<(), PredictionError> {
        let registry = registry_for(Location::Nsukka);
        let start = NaiveDate::MAX - Days::new(2);
        assert!(matches!(
            predict_range(&registry, start, DEFAULT_HORIZON_DAYS),
            Err(PredictionError::HorizonOutOfRange { num_days: 7, .. })
        ));
        // The last three days still fit.
        assert_eq!(predict_range(&registry, start, 3)?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_predict_range_zero_days_is_empty() -> Result<(), PredictionError> {
        let registry = registry_for(Location::Ayingba);
        assert!(predict_range(&registry, date(2021, 1, 1), 0)?.is_empty());
        Ok(())
    }
}
