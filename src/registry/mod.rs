pub mod error;
pub mod model_registry;
pub mod registry_cache;
