pub mod feature_vector;
pub mod location;
pub mod parameter;
pub mod report;
