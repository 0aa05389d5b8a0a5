//! Defines the `Parameter` enum, mapping the station logger's target column
//! names to variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A weather parameter predicted by one trained regressor per location.
///
/// The variants correspond to the averaged/totalled logger columns the models
/// were trained on. [`Parameter::code`] returns that column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    /// `AirTemp_Avg`: mean air temperature.
    AirTemperature,
    /// `BarPress_Avg`: mean barometric pressure.
    BarometricPressure,
    /// `Rainfallrate_mm_Tot`: rainfall total.
    Rainfall,
    /// `RelativeHumidity`: relative humidity.
    RelativeHumidity,
    /// `SoilTemp_Avg`: mean soil temperature.
    SoilTemperature,
    /// `SolarRadiation_Avg`: mean incoming solar radiation.
    SolarRadiation,
    /// `WindDir`: prevailing wind direction.
    WindDirection,
    /// `WindSpeed_Avg`: mean wind speed.
    WindSpeed,
    /// `SoilMoisture`: volumetric soil water content.
    SoilMoisture,
}

impl Parameter {
    /// Every parameter, in the canonical order used by the station profiles.
    pub const ALL: [Parameter; 9] = [
        Parameter::AirTemperature,
        Parameter::BarometricPressure,
        Parameter::Rainfall,
        Parameter::RelativeHumidity,
        Parameter::SoilTemperature,
        Parameter::SolarRadiation,
        Parameter::WindDirection,
        Parameter::WindSpeed,
        Parameter::SoilMoisture,
    ];

    /// The logger column name the models were trained against.
    pub fn code(&self) -> &'static str {
        match self {
            Parameter::AirTemperature => "AirTemp_Avg",
            Parameter::BarometricPressure => "BarPress_Avg",
            Parameter::Rainfall => "Rainfallrate_mm_Tot",
            Parameter::RelativeHumidity => "RelativeHumidity",
            Parameter::SoilTemperature => "SoilTemp_Avg",
            Parameter::SolarRadiation => "SolarRadiation_Avg",
            Parameter::WindDirection => "WindDir",
            Parameter::WindSpeed => "WindSpeed_Avg",
            Parameter::SoilMoisture => "SoilMoisture",
        }
    }

    /// Looks up a parameter by its logger column name.
    pub fn from_code(code: &str) -> Option<Self> {
        Parameter::ALL.into_iter().find(|p| p.code() == code)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_resolvable() {
        for parameter in Parameter::ALL {
            assert_eq!(Parameter::from_code(parameter.code()), Some(parameter));
        }
        assert_eq!(Parameter::from_code("SolarRadiationr_Avg"), None);
    }
}
