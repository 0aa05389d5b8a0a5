//! Defines the `Location` enum, the closed set of sites for which trained
//! models exist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A weather station site with its own set of trained regression models.
///
/// The set is closed: every variant has a profile in the builtin
/// [`crate::Catalog`], and anything else entered by a user is rejected while
/// parsing.
///
/// # Examples
///
/// ```
/// use hyperlocal_weather::Location;
///
/// let site: Location = "nsukka".parse().unwrap();
/// assert_eq!(site, Location::Nsukka);
///
/// // The alternate spelling of the Kogi State town is accepted as well.
/// assert_eq!("Anyigba".parse::<Location>().unwrap(), Location::Ayingba);
/// assert_eq!(Location::Ayingba.to_string(), "Ayingba");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    /// University of Nigeria, Nsukka station (Enugu State).
    Nsukka,
    /// Kogi State University station, Anyigba (historically spelled "Ayingba").
    Ayingba,
}

impl Location {
    /// All locations, in the order they are offered for selection.
    pub const ALL: [Location; 2] = [Location::Nsukka, Location::Ayingba];

    /// The canonical identifier, also used as the artifact directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Nsukka => "Nsukka",
            Location::Ayingba => "Ayingba",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a site identifier does not name a known [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown location '{0}'")]
pub struct ParseLocationError(pub String);

impl FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nsukka" => Ok(Location::Nsukka),
            "ayingba" | "anyigba" => Ok(Location::Ayingba),
            _ => Err(ParseLocationError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for location in Location::ALL {
            assert_eq!(location.to_string().parse::<Location>(), Ok(location));
        }
    }

    #[test]
    fn test_parse_accepts_case_and_whitespace() {
        assert_eq!(" NSUKKA ".parse::<Location>(), Ok(Location::Nsukka));
        assert_eq!("anyigba".parse::<Location>(), Ok(Location::Ayingba));
    }

    #[test]
    fn test_parse_rejects_unknown_site() {
        let err = "Lagos".parse::<Location>().unwrap_err();
        assert_eq!(err, ParseLocationError("Lagos".to_string()));
        assert_eq!(err.to_string(), "Unknown location 'Lagos'");
    }
}
