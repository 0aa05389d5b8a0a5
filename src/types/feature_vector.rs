//! Calendar feature derivation: turns a date into the fixed-order numeric input
//! the regressors were trained on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 6;

/// Feature names, in the column order the models expect.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "year",
    "month",
    "day",
    "day_of_week",
    "week_of_year",
    "quarter",
];

/// The six calendar features derived from a single date.
///
/// `day_of_week`, `week_of_year` and `quarter` are always consistent with
/// `year`/`month`/`day`: vectors are built by [`FeatureVector::derive`], and
/// deserialization rejects any vector that `derive` would not produce.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hyperlocal_weather::FeatureVector;
///
/// let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
/// let features = FeatureVector::derive(date);
///
/// // 2021-01-01 is a Friday in ISO week 53 of 2020.
/// assert_eq!(features.day_of_week(), 4);
/// assert_eq!(features.week_of_year(), 53);
/// assert_eq!(features.as_array(), [2021.0, 1.0, 1.0, 4.0, 53.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureVector")]
pub struct FeatureVector {
    year: i32,
    month: u32,
    day: u32,
    day_of_week: u32,
    week_of_year: u32,
    quarter: u32,
}

impl FeatureVector {
    /// Derives the feature vector for `date`.
    ///
    /// * Day of week is the ISO weekday index, Monday = 0 through Sunday = 6.
    /// * Week of year is the ISO 8601 week number (1 to 53), so early January
    ///   dates can belong to the last week of the previous year.
    /// * Quarter is `(month - 1) / 3 + 1`.
    pub fn derive(date: NaiveDate) -> Self {
        let month = date.month();
        Self {
            year: date.year(),
            month,
            day: date.day(),
            day_of_week: date.weekday().num_days_from_monday(),
            week_of_year: date.iso_week().week(),
            quarter: (month - 1) / 3 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn day_of_week(&self) -> u32 {
        self.day_of_week
    }

    pub fn week_of_year(&self) -> u32 {
        self.week_of_year
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    /// The features as regressor input, in [`FEATURE_NAMES`] order.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.year),
            f64::from(self.month),
            f64::from(self.day),
            f64::from(self.day_of_week),
            f64::from(self.week_of_year),
            f64::from(self.quarter),
        ]
    }
}

impl From<NaiveDate> for FeatureVector {
    fn from(date: NaiveDate) -> Self {
        FeatureVector::derive(date)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.year, self.month, self.day, self.day_of_week, self.week_of_year, self.quarter
        )
    }
}

/// A deserialized vector whose fields do not describe a real date, or whose
/// derived fields disagree with that date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFeatureVector {
    #[error("{year}-{month}-{day} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Features {found} do not match the features {expected} derived from the date")]
    Inconsistent {
        found: String,
        expected: FeatureVector,
    },
}

#[derive(Deserialize)]
struct RawFeatureVector {
    year: i32,
    month: u32,
    day: u32,
    day_of_week: u32,
    week_of_year: u32,
    quarter: u32,
}

impl TryFrom<RawFeatureVector> for FeatureVector {
    type Error = InvalidFeatureVector;

    fn try_from(raw: RawFeatureVector) -> Result<Self, Self::Error> {
        let date = NaiveDate::from_ymd_opt(raw.year, raw.month, raw.day).ok_or(
            InvalidFeatureVector::InvalidDate {
                year: raw.year,
                month: raw.month,
                day: raw.day,
            },
        )?;
        let expected = FeatureVector::derive(date);
        if (raw.day_of_week, raw.week_of_year, raw.quarter)
            != (expected.day_of_week, expected.week_of_year, expected.quarter)
        {
            return Err(InvalidFeatureVector::Inconsistent {
                found: format!(
                    "({}, {}, {}, {}, {}, {})",
                    raw.year, raw.month, raw.day, raw.day_of_week, raw.week_of_year, raw.quarter
                ),
                expected,
            });
        }
        Ok(expected)
    }
}

/// Shorthand for [`FeatureVector::derive`].
pub fn derive_features(date: NaiveDate) -> FeatureVector {
    FeatureVector::derive(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_year_2021_vector() {
        let features = derive_features(date(2021, 1, 1));
        assert_eq!(features.to_string(), "(2021, 1, 1, 4, 53, 1)");
    }

    #[test]
    fn test_deserialize_accepts_only_derived_vectors() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&derive_features(date(2021, 1, 1)))?;
        let parsed: FeatureVector = serde_json::from_str(&json)?;
        assert_eq!(parsed, derive_features(date(2021, 1, 1)));

        let inconsistent = r#"{"year":2021,"month":1,"day":1,"day_of_week":6,"week_of_year":1,"quarter":4}"#;
        let err = serde_json::from_str::<FeatureVector>(inconsistent).unwrap_err();
        assert!(err.to_string().contains("(2021, 1, 1, 4, 53, 1)"), "{}", err);

        let impossible = r#"{"year":2021,"month":2,"day":30,"day_of_week":1,"week_of_year":9,"quarter":1}"#;
        assert!(serde_json::from_str::<FeatureVector>(impossible).is_err());
        Ok(())
    }

    #[test]
    fn test_iso_week_boundaries() {
        // (date, day_of_week, week_of_year)
        let cases = [
            (date(2020, 12, 31), 3, 53),
            (date(2021, 1, 3), 6, 53),
            (date(2021, 1, 4), 0, 1),
            (date(2024, 12, 30), 0, 1),
            (date(2026, 1, 1), 3, 1),
            (date(2027, 1, 1), 4, 53),
        ];
        for (day, dow, week) in cases {
            let features = derive_features(day);
            assert_eq!(features.day_of_week(), dow, "day of week for {}", day);
            assert_eq!(features.week_of_year(), week, "week of year for {}", day);
        }
    }

    #[test]
    fn test_quarter_is_ceiling_of_month_over_three() {
        for month in 1..=12 {
            let features = derive_features(date(2023, month, 15));
            assert_eq!(features.quarter(), month.div_ceil(3));
        }
    }

    #[test]
    fn test_consecutive_days_stay_consistent() {
        let mut previous = derive_features(date(2015, 1, 1));
        for day in date(2015, 1, 2).iter_days().take(365 * 12) {
            let current = derive_features(day);
            assert_eq!(current.day_of_week(), (previous.day_of_week() + 1) % 7);
            if current.day_of_week() == 0 {
                assert!(
                    current.week_of_year() == previous.week_of_year() + 1
                        || current.week_of_year() == 1,
                    "week did not advance on Monday {}",
                    day
                );
            } else {
                assert_eq!(current.week_of_year(), previous.week_of_year());
            }
            assert!((1..=53).contains(&current.week_of_year()));
            assert_eq!(current.year(), day.year());
            previous = current;
        }
    }
}
