//! Runtime configuration for a [`crate::Forecaster`].

use crate::error::ForecastError;
use crate::prediction::engine::DEFAULT_HORIZON_DAYS;
use crate::types::location::Location;
use bon::bon;
use std::path::{Path, PathBuf};

/// Settings shared by every session of a [`crate::Forecaster`].
///
/// # Examples
///
/// ```
/// use hyperlocal_weather::{ForecastConfig, Location};
///
/// let config = ForecastConfig::builder()
///     .model_dir("/srv/models")
///     .horizon_days(3)
///     .locations(vec![Location::Nsukka])
///     .build()
///     .unwrap();
/// assert_eq!(config.horizon_days(), 3);
///
/// // Zero-day horizons are rejected.
/// assert!(ForecastConfig::builder().horizon_days(0).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastConfig {
    model_dir: Option<PathBuf>,
    horizon_days: u32,
    locations: Vec<Location>,
}

#[bon]
impl ForecastConfig {
    /// Validates and creates a configuration.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Root of the artifact directory. Defaults to
    ///   `<data dir>/hyperlocal_weather/models` when unset.
    /// * `horizon_days` - Days covered by multi-day forecasts, at least 1.
    /// * `locations` - Locations the forecaster serves. Defaults to all.
    ///
    /// # Errors
    ///
    /// [`ForecastError::InvalidConfig`] for a zero horizon or an empty location list.
    #[builder]
    pub fn new(
        #[builder(into)] model_dir: Option<PathBuf>,
        #[builder(default = DEFAULT_HORIZON_DAYS)] horizon_days: u32,
        #[builder(default = Location::ALL.to_vec())] locations: Vec<Location>,
    ) -> Result<Self, ForecastError> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidConfig(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if locations.is_empty() {
            return Err(ForecastError::InvalidConfig(
                "at least one location must be configured".to_string(),
            ));
        }
        let mut unique = Vec::with_capacity(locations.len());
        for location in locations {
            if !unique.contains(&location) {
                unique.push(location);
            }
        }
        Ok(Self {
            model_dir,
            horizon_days,
            locations: unique,
        })
    }

    /// The configured artifact root, if one was given.
    pub fn model_dir(&self) -> Option<&Path> {
        self.model_dir.as_deref()
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
            locations: Location::ALL.to_vec(),
        }
    }
}
