use crate::models::error::InferenceFailure;
use std::fmt::Debug;

/// A trained model that maps a feature vector to a single value.
///
/// Implementations must be read-only at inference time: one instance is shared
/// by every session that selected its location.
pub trait Regressor: Debug + Send + Sync {
    /// Predicts a value for `features`, given in [`crate::FEATURE_NAMES`] order.
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceFailure>;
}
