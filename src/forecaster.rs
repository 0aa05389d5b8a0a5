//! The main entry point: owns the catalog, the registry cache and the
//! identity provider, and hands out [`SessionClient`]s.

use crate::catalog::profile::{Catalog, LocationProfile};
use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::models::store::{DirectoryStore, ModelStore};
use crate::prediction::assembler::{assemble_daily, assemble_weekly};
use crate::prediction::engine::{predict_one, predict_range};
use crate::registry::error::RegistryError;
use crate::registry::model_registry::ModelRegistry;
use crate::registry::registry_cache::RegistryCache;
use crate::session::identity::IdentityProvider;
use crate::session::machine::SessionClient;
use crate::session::state::SessionState;
use crate::types::feature_vector::FeatureVector;
use crate::types::location::Location;
use crate::types::report::PredictionReport;
use crate::utils::{ensure_model_dir_exists, get_model_dir};
use bon::bon;
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

/// Serves weather predictions for the configured locations.
///
/// A `Forecaster` is shared by all sessions (it is `Send + Sync`); each
/// session keeps its own [`SessionState`] and drives it through
/// [`Forecaster::session()`]. Model registries are loaded lazily, once per
/// location, and then reused.
///
/// # Examples
///
/// ```no_run
/// use hyperlocal_weather::{ForecastConfig, Forecaster, ForecastError, Location, MemoryIdentityProvider};
/// use chrono::NaiveDate;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ForecastError> {
/// let forecaster = Forecaster::builder()
///     .config(ForecastConfig::builder().model_dir("/srv/models").build()?)
///     .identity(Arc::new(MemoryIdentityProvider::new()))
///     .build()
///     .await?;
///
/// let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
/// let week = forecaster.forecast_weekly(Location::Nsukka, start).await?;
/// println!("{}", String::from_utf8_lossy(&week.to_csv()?));
/// # Ok(())
/// # }
/// ```
pub struct Forecaster {
    config: ForecastConfig,
    catalog: Arc<Catalog>,
    registries: RegistryCache,
    identity: Arc<dyn IdentityProvider>,
}

#[bon]
impl Forecaster {
    /// Creates a forecaster.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity provider used for sign-in and sign-up.
    /// * `config` - Optional [`ForecastConfig`]; defaults apply when omitted.
    /// * `store` - Optional artifact store. When omitted a [`DirectoryStore`]
    ///   rooted at the configured (or default) model directory is used, and that
    ///   directory must exist.
    /// * `catalog` - Optional location catalog, [`Catalog::builtin()`] by default.
    ///
    /// # Errors
    ///
    /// * [`ForecastError::Catalog`] if a configured location has an incomplete profile.
    /// * [`ForecastError::ModelDirResolution`], [`ForecastError::ModelDir`] or
    ///   [`ForecastError::ModelDirNotADirectory`] if the model directory is unusable.
    #[builder]
    pub async fn new(
        identity: Arc<dyn IdentityProvider>,
        config: Option<ForecastConfig>,
        store: Option<Arc<dyn ModelStore>>,
        catalog: Option<Catalog>,
    ) -> Result<Self, ForecastError> {
        let config = config.unwrap_or_default();
        let catalog = catalog.unwrap_or_default();
        catalog.validate(config.locations())?;

        let store = match store {
            Some(store) => store,
            None => {
                let model_dir = match config.model_dir() {
                    Some(dir) => dir.to_path_buf(),
                    None => get_model_dir().map_err(ForecastError::ModelDirResolution)?,
                };
                ensure_model_dir_exists(&model_dir).await?;
                info!("Loading models from {}", model_dir.display());
                Arc::new(DirectoryStore::new(model_dir)) as Arc<dyn ModelStore>
            }
        };

        let catalog = Arc::new(catalog);
        let registries = RegistryCache::new(store, catalog.clone(), config.locations().to_vec());
        Ok(Self {
            config,
            catalog,
            registries,
            identity,
        })
    }

    /// A fresh, signed-out session state.
    pub fn new_session(&self) -> SessionState {
        SessionState::new()
    }

    /// Returns a client that applies user intents to `state`.
    pub fn session<'a>(&'a self, state: &'a mut SessionState) -> SessionClient<'a> {
        SessionClient::new(self, state)
    }

    /// Resolves the model registry of `location`, loading it on first use.
    ///
    /// # Errors
    ///
    /// See [`RegistryCache::resolve`].
    pub async fn registry(&self, location: Location) -> Result<Arc<ModelRegistry>, ForecastError> {
        Ok(self.registries.resolve(location).await?)
    }

    /// Predicts every target of `location` for `date`, without a session.
    ///
    /// # Errors
    ///
    /// Registry resolution, inference and display-name errors.
    pub async fn forecast_daily(
        &self,
        location: Location,
        date: NaiveDate,
    ) -> Result<PredictionReport, ForecastError> {
        let registry = self.registry(location).await?;
        let predictions = predict_one(&registry, &FeatureVector::derive(date))?;
        Ok(assemble_daily(self.profile(location)?, date, &predictions)?)
    }

    /// Predicts the configured horizon for `location` starting at `start`.
    ///
    /// # Errors
    ///
    /// Registry resolution, inference and display-name errors.
    pub async fn forecast_weekly(
        &self,
        location: Location,
        start: NaiveDate,
    ) -> Result<PredictionReport, ForecastError> {
        let registry = self.registry(location).await?;
        let days = predict_range(&registry, start, self.config.horizon_days())?;
        Ok(assemble_weekly(self.profile(location)?, &days)?)
    }

    fn profile(&self, location: Location) -> Result<&LocationProfile, RegistryError> {
        self.catalog
            .profile(location)
            .ok_or(RegistryError::UnknownLocation(location))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// The shared registry cache, e.g. to [`RegistryCache::invalidate`] after re-training.
    pub fn registries(&self) -> &RegistryCache {
        &self.registries
    }

    pub(crate) fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }
}
