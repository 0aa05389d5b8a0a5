pub mod error;
pub mod profile;
