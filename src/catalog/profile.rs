//! Static configuration of which parameters are predicted for each location,
//! which artifact serves each parameter, and how each parameter is labelled.

use crate::catalog::error::CatalogError;
use crate::types::location::Location;
use crate::types::parameter::Parameter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const ARTIFACT_KEY_NSUKKA_SOLAR: &str = "SolarRadiationr_Avg";

/// A parameter predicted at a location, together with the key under which its
/// trained model is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub parameter: Parameter,
    pub artifact_key: String,
}

/// Everything the pipeline needs to know about one location.
///
/// The order of [`LocationProfile::targets`] is the canonical parameter order:
/// registries, predictions and reports all follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationProfile {
    location: Location,
    targets: Vec<Target>,
    display_names: Vec<(Parameter, String)>,
}

impl LocationProfile {
    /// Creates a profile without targets.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            targets: Vec::new(),
            display_names: Vec::new(),
        }
    }

    /// Appends a target parameter, served by the artifact stored under `artifact_key`.
    pub fn with_target(mut self, parameter: Parameter, artifact_key: impl Into<String>) -> Self {
        self.targets.push(Target {
            parameter,
            artifact_key: artifact_key.into(),
        });
        self
    }

    /// Sets the label (with unit) shown for `parameter`. Replaces any previous label.
    pub fn with_display_name(mut self, parameter: Parameter, name: impl Into<String>) -> Self {
        let name = name.into();
        match self.display_names.iter_mut().find(|(p, _)| *p == parameter) {
            Some(entry) => entry.1 = name,
            None => self.display_names.push((parameter, name)),
        }
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Target parameters in canonical order.
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.targets.iter().map(|t| t.parameter)
    }

    pub fn display_name(&self, parameter: Parameter) -> Option<&str> {
        self.display_names
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, name)| name.as_str())
    }

    pub fn artifact_key(&self, parameter: Parameter) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| t.parameter == parameter)
            .map(|t| t.artifact_key.as_str())
    }

    /// Checks that the profile has targets, no duplicates, no empty artifact
    /// keys and a display name for every target.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.targets.is_empty() {
            return Err(CatalogError::EmptyTargets(self.location));
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.parameter) {
                return Err(CatalogError::DuplicateTarget {
                    location: self.location,
                    parameter: target.parameter,
                });
            }
            if target.artifact_key.trim().is_empty() {
                return Err(CatalogError::EmptyArtifactKey {
                    location: self.location,
                    parameter: target.parameter,
                });
            }
            if self.display_name(target.parameter).is_none() {
                return Err(CatalogError::UnmappedParameter {
                    location: self.location,
                    parameter: target.parameter,
                });
            }
        }
        Ok(())
    }
}

/// The set of location profiles known to the application.
///
/// [`Catalog::builtin`] describes the deployed stations; custom catalogs are
/// mostly useful in tests.
///
/// # Examples
///
/// ```
/// use hyperlocal_weather::{Catalog, Location, Parameter};
///
/// let catalog = Catalog::builtin();
/// catalog.validate(&Location::ALL).unwrap();
///
/// let nsukka = catalog.profile(Location::Nsukka).unwrap();
/// assert_eq!(nsukka.targets().len(), 9);
/// assert_eq!(nsukka.artifact_key(Parameter::SolarRadiation), Some("SolarRadiationr_Avg"));
/// assert_eq!(nsukka.display_name(Parameter::AirTemperature), Some("Air Temperature (°C)"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    profiles: Vec<LocationProfile>,
}

impl Catalog {
    pub fn new(profiles: Vec<LocationProfile>) -> Self {
        Self { profiles }
    }

    /// Profiles for the Nsukka and Ayingba stations.
    pub fn builtin() -> Self {
        let profiles = Location::ALL
            .into_iter()
            .map(|location| {
                Parameter::ALL
                    .into_iter()
                    .fold(LocationProfile::new(location), |profile, parameter| {
                        profile
                            .with_target(parameter, builtin_artifact_key(location, parameter))
                            .with_display_name(parameter, builtin_display_name(parameter))
                    })
            })
            .collect();
        Self { profiles }
    }

    pub fn profile(&self, location: Location) -> Option<&LocationProfile> {
        self.profiles.iter().find(|p| p.location == location)
    }

    pub fn profiles(&self) -> &[LocationProfile] {
        &self.profiles
    }

    /// Validates the profile of every location in `locations`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingProfile`] when a location has no profile,
    /// or the first problem reported by [`LocationProfile::validate`].
    pub fn validate(&self, locations: &[Location]) -> Result<(), CatalogError> {
        for location in locations {
            self.profile(*location)
                .ok_or(CatalogError::MissingProfile(*location))?
                .validate()?;
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

fn builtin_artifact_key(location: Location, parameter: Parameter) -> &'static str {
    match (location, parameter) {
        // The Nsukka solar model was exported under a misspelled column name.
        (Location::Nsukka, Parameter::SolarRadiation) => ARTIFACT_KEY_NSUKKA_SOLAR,
        _ => parameter.code(),
    }
}

fn builtin_display_name(parameter: Parameter) -> &'static str {
    match parameter {
        Parameter::AirTemperature => "Air Temperature (°C)",
        Parameter::BarometricPressure => "Barometric Pressure (mbar)",
        Parameter::Rainfall => "Rainfall (mm)",
        Parameter::RelativeHumidity => "Relative Humidity (%)",
        Parameter::SoilTemperature => "Soil Temperature (°C)",
        Parameter::SolarRadiation => "Solar Radiation (W/m²)",
        Parameter::WindDirection => "Wind Direction (°)",
        Parameter::WindSpeed => "Wind Speed (m/s)",
        Parameter::SoilMoisture => "Soil Moisture (m³/m³)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.validate(&Location::ALL), Ok(()));
        for profile in catalog.profiles() {
            assert_eq!(
                profile.parameters().collect::<Vec<_>>(),
                Parameter::ALL.to_vec()
            );
        }
    }

    #[test]
    fn test_artifact_keys_differ_only_for_nsukka_solar() {
        let catalog = Catalog::builtin();
        let nsukka = catalog.profile(Location::Nsukka).unwrap();
        let ayingba = catalog.profile(Location::Ayingba).unwrap();
        for parameter in Parameter::ALL {
            let same = nsukka.artifact_key(parameter) == ayingba.artifact_key(parameter);
            assert_eq!(same, parameter != Parameter::SolarRadiation);
        }
        assert_eq!(
            ayingba.artifact_key(Parameter::SolarRadiation),
            Some("SolarRadiation_Avg")
        );
    }

    #[test]
    fn test_validate_reports_missing_display_name() {
        let profile = LocationProfile::new(Location::Nsukka)
            .with_target(Parameter::AirTemperature, "AirTemp_Avg")
            .with_display_name(Parameter::AirTemperature, "Air Temperature (°C)")
            .with_target(Parameter::WindSpeed, "WindSpeed_Avg");
        assert_eq!(
            profile.validate(),
            Err(CatalogError::UnmappedParameter {
                location: Location::Nsukka,
                parameter: Parameter::WindSpeed,
            })
        );
    }

    #[test]
    fn test_validate_reports_empty_and_duplicate_targets() {
        assert_eq!(
            LocationProfile::new(Location::Ayingba).validate(),
            Err(CatalogError::EmptyTargets(Location::Ayingba))
        );

        let duplicated = LocationProfile::new(Location::Ayingba)
            .with_target(Parameter::Rainfall, "Rainfallrate_mm_Tot")
            .with_target(Parameter::Rainfall, "Rainfallrate_mm_Tot")
            .with_display_name(Parameter::Rainfall, "Rainfall (mm)");
        assert_eq!(
            duplicated.validate(),
            Err(CatalogError::DuplicateTarget {
                location: Location::Ayingba,
                parameter: Parameter::Rainfall,
            })
        );
    }

    #[test]
    fn test_validate_requires_profile_for_every_location() {
        let catalog = Catalog::new(vec![Catalog::builtin()
            .profile(Location::Nsukka)
            .unwrap()
            .clone()]);
        assert_eq!(catalog.validate(&[Location::Nsukka]), Ok(()));
        assert_eq!(
            catalog.validate(&Location::ALL),
            Err(CatalogError::MissingProfile(Location::Ayingba))
        );
    }

    #[test]
    fn test_display_name_can_be_replaced() {
        let profile = LocationProfile::new(Location::Nsukka)
            .with_display_name(Parameter::WindSpeed, "Wind Speed (m/s)")
            .with_display_name(Parameter::WindSpeed, "Wind Speed (km/h)");
        assert_eq!(
            profile.display_name(Parameter::WindSpeed),
            Some("Wind Speed (km/h)")
        );
    }
}
