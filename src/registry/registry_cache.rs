use crate::catalog::profile::{Catalog, LocationProfile};
use crate::models::store::ModelStore;
use crate::registry::error::RegistryError;
use crate::registry::model_registry::ModelRegistry;
use crate::types::location::Location;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

type RegistrySlot = Arc<OnceCell<Arc<ModelRegistry>>>;

/// Process-wide cache holding at most one [`ModelRegistry`] per location.
///
/// Registries are immutable once loaded, so every session selecting the same
/// location shares one instance. Each location gets its own `OnceCell`: the
/// first resolution loads the artifacts while concurrent resolutions of the
/// same location wait for it, and a failed load leaves the cell empty so the
/// next call retries.
pub struct RegistryCache {
    store: Arc<dyn ModelStore>,
    catalog: Arc<Catalog>,
    locations: Vec<Location>,
    slots: Mutex<HashMap<Location, RegistrySlot>>,
}

impl RegistryCache {
    /// Creates an empty cache serving only the `locations` listed.
    pub fn new(store: Arc<dyn ModelStore>, catalog: Arc<Catalog>, locations: Vec<Location>) -> Self {
        Self {
            store,
            catalog,
            locations,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the registry for `location`, loading it on first use.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::UnknownLocation`] if the location is not configured.
    /// * [`RegistryError::ArtifactLoad`] if any artifact fails to load. Nothing
    ///   is cached in that case.
    /// * [`RegistryError::TaskJoin`] if the blocking load task panicked.
    pub async fn resolve(&self, location: Location) -> Result<Arc<ModelRegistry>, RegistryError> {
        if !self.locations.contains(&location) {
            return Err(RegistryError::UnknownLocation(location));
        }
        let profile = self
            .catalog
            .profile(location)
            .ok_or(RegistryError::UnknownLocation(location))?
            .clone();

        // Hold the map lock only long enough to fetch the slot.
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(location).or_default().clone()
        };

        if let Some(registry) = slot.get() {
            debug!("Registry cache hit for {}", location);
            return Ok(registry.clone());
        }

        let registry = slot
            .get_or_try_init(|| self.load(location, profile))
            .await?;
        Ok(registry.clone())
    }

    async fn load(
        &self,
        location: Location,
        profile: LocationProfile,
    ) -> Result<Arc<ModelRegistry>, RegistryError> {
        info!(
            "Loading {} models for {}",
            profile.targets().len(),
            location
        );
        let store = self.store.clone();
        let loaded =
            tokio::task::spawn_blocking(move || ModelRegistry::load(store.as_ref(), &profile))
                .await?;
        match loaded {
            Ok(registry) => Ok(Arc::new(registry)),
            Err(e) => {
                warn!("Could not load models for {}: {}", location, e);
                Err(e)
            }
        }
    }

    /// Drops the cached registry of `location`; the next `resolve` reloads it.
    /// Sessions still holding the old registry keep using it until they reselect.
    pub async fn invalidate(&self, location: Location) -> bool {
        let removed = self.slots.lock().await.remove(&location);
        let was_loaded = removed.is_some_and(|slot| slot.initialized());
        if was_loaded {
            info!("Invalidated cached models for {}", location);
        }
        was_loaded
    }

    /// Whether a registry for `location` is currently cached.
    pub async fn is_cached(&self, location: Location) -> bool {
        self.slots
            .lock()
            .await
            .get(&location)
            .is_some_and(|slot| slot.initialized())
    }
}
