use crate::catalog::profile::LocationProfile;
use crate::models::regressor::Regressor;
use crate::models::store::ModelStore;
use crate::registry::error::RegistryError;
use crate::types::location::Location;
use crate::types::parameter::Parameter;
use std::sync::Arc;

/// The trained regressors of one location, in canonical parameter order.
///
/// A registry is complete or does not exist: [`ModelRegistry::load`] fails if
/// any single artifact cannot be loaded.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    location: Location,
    models: Vec<(Parameter, Arc<dyn Regressor>)>,
}

impl ModelRegistry {
    /// Loads every target of `profile` from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ArtifactLoad`] naming the first parameter whose
    /// artifact is missing or cannot be decoded.
    pub fn load(store: &dyn ModelStore, profile: &LocationProfile) -> Result<Self, RegistryError> {
        let location = profile.location();
        let models = profile
            .targets()
            .iter()
            .map(|target| {
                store
                    .load(location, &target.artifact_key)
                    .map(|model| (target.parameter, model))
                    .map_err(|source| RegistryError::ArtifactLoad {
                        location,
                        parameter: target.parameter,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { location, models })
    }

    /// Builds a registry from already loaded models, kept in the given order.
    pub fn from_models(location: Location, models: Vec<(Parameter, Arc<dyn Regressor>)>) -> Self {
        Self { location, models }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.models.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, &dyn Regressor)> + '_ {
        self.models.iter().map(|(p, m)| (*p, m.as_ref()))
    }

    pub fn get(&self, parameter: Parameter) -> Option<&dyn Regressor> {
        self.models
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, m)| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::profile::Catalog;
    use crate::models::artifact::{DecisionTree, ModelArtifact, RandomForest};
    use crate::models::store::MemoryStore;

    fn constant(value: f64) -> Arc<dyn Regressor> {
        Arc::new(ModelArtifact::RandomForest(RandomForest {
            n_features: 6,
            trees: vec![DecisionTree::leaf(value)],
        }))
    }

    fn full_store(location: Location, profile: &LocationProfile) -> MemoryStore {
        profile
            .targets()
            .iter()
            .enumerate()
            .fold(MemoryStore::new(), |store, (i, target)| {
                store.with_model(location, target.artifact_key.clone(), constant(i as f64))
            })
    }

    #[test]
    fn test_load_follows_profile_order() -> Result<(), RegistryError> {
        let catalog = Catalog::builtin();
        let profile = catalog.profile(Location::Nsukka).unwrap();
        let store = full_store(Location::Nsukka, profile);

        let registry = ModelRegistry::load(&store, profile)?;
        assert_eq!(registry.location(), Location::Nsukka);
        assert_eq!(
            registry.parameters().collect::<Vec<_>>(),
            profile.parameters().collect::<Vec<_>>()
        );
        let wind = registry.get(Parameter::WindDirection).unwrap();
        assert_eq!(wind.predict(&[0.0; 6]), Ok(6.0));
        Ok(())
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let catalog = Catalog::builtin();
        let profile = catalog.profile(Location::Ayingba).unwrap();
        // Everything except soil moisture.
        let store = profile
            .targets()
            .iter()
            .filter(|t| t.parameter != Parameter::SoilMoisture)
            .fold(MemoryStore::new(), |store, target| {
                store.with_model(Location::Ayingba, target.artifact_key.clone(), constant(1.0))
            });

        match ModelRegistry::load(&store, profile) {
            Err(RegistryError::ArtifactLoad {
                location,
                parameter,
                ..
            }) => {
                assert_eq!(location, Location::Ayingba);
                assert_eq!(parameter, Parameter::SoilMoisture);
            }
            other => panic!("expected an artifact load error, got {:?}", other),
        }
    }
}
