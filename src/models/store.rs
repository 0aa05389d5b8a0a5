//! Model artifact stores: where trained regressors come from.

use crate::models::artifact::ModelArtifact;
use crate::models::error::ModelStoreError;
use crate::models::regressor::Regressor;
use crate::types::location::Location;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ARTIFACT_SUFFIX: &str = "_random_forest_model";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Source of trained regressors, keyed by location and artifact key.
///
/// Loading is blocking; the registry cache calls it on tokio's blocking pool.
pub trait ModelStore: Send + Sync {
    fn load(
        &self,
        location: Location,
        artifact_key: &str,
    ) -> Result<Arc<dyn Regressor>, ModelStoreError>;
}

/// Reads artifacts from a directory tree laid out as
/// `<root>/<Location>/<artifact_key>_random_forest_model.{bin,json}`.
///
/// The bincode file is preferred; the JSON form is what training scripts
/// usually export.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_path(&self, location: Location, artifact_key: &str, extension: &str) -> PathBuf {
        self.root
            .join(location.as_str())
            .join(format!("{}{}.{}", artifact_key, ARTIFACT_SUFFIX, extension))
    }

    /// Writes `artifact` in bincode form, creating the location directory if needed.
    pub fn save(
        &self,
        location: Location,
        artifact_key: &str,
        artifact: &ModelArtifact,
    ) -> Result<PathBuf, ModelStoreError> {
        let path = self.artifact_path(location, artifact_key, "bin");
        let bytes = bincode::serde::encode_to_vec(artifact, BINCODE_CONFIG)
            .map_err(|e| ModelStoreError::BincodeEncode(Box::new(e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ModelStoreError::ArtifactWrite(parent.to_path_buf(), e))?;
        }
        std::fs::write(&path, &bytes)
            .map_err(|e| ModelStoreError::ArtifactWrite(path.clone(), e))?;
        info!(
            "Wrote model artifact ({} bytes) to {}",
            bytes.len(),
            path.display()
        );
        Ok(path)
    }

    fn read_bincode(path: &Path) -> Result<ModelArtifact, ModelStoreError> {
        let bytes =
            std::fs::read(path).map_err(|e| ModelStoreError::ArtifactRead(path.to_path_buf(), e))?;
        let (artifact, _) =
            bincode::serde::decode_from_slice::<ModelArtifact, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| ModelStoreError::BincodeDecode(path.to_path_buf(), Box::new(e)))?;
        Ok(artifact)
    }

    fn read_json(path: &Path) -> Result<ModelArtifact, ModelStoreError> {
        let bytes =
            std::fs::read(path).map_err(|e| ModelStoreError::ArtifactRead(path.to_path_buf(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| ModelStoreError::JsonParse(path.to_path_buf(), e))
    }
}

impl ModelStore for DirectoryStore {
    fn load(
        &self,
        location: Location,
        artifact_key: &str,
    ) -> Result<Arc<dyn Regressor>, ModelStoreError> {
        let bin_path = self.artifact_path(location, artifact_key, "bin");
        let artifact = if bin_path.is_file() {
            debug!("Loading bincode artifact {}", bin_path.display());
            Self::read_bincode(&bin_path)?
        } else {
            let json_path = self.artifact_path(location, artifact_key, "json");
            if !json_path.is_file() {
                return Err(ModelStoreError::NotFound {
                    location,
                    artifact_key: artifact_key.to_string(),
                    searched: self.root.join(location.as_str()),
                });
            }
            debug!("Loading JSON artifact {}", json_path.display());
            Self::read_json(&json_path)?
        };
        Ok(Arc::new(artifact))
    }
}

/// An in-process store, filled up front. Counts loads so callers can observe caching.
#[derive(Debug, Default)]
pub struct MemoryStore {
    models: HashMap<(Location, String), Arc<dyn Regressor>>,
    loads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        location: Location,
        artifact_key: impl Into<String>,
        model: Arc<dyn Regressor>,
    ) {
        self.models.insert((location, artifact_key.into()), model);
    }

    pub fn with_model(
        mut self,
        location: Location,
        artifact_key: impl Into<String>,
        model: Arc<dyn Regressor>,
    ) -> Self {
        self.insert(location, artifact_key, model);
        self
    }

    /// Number of successful and failed `load` calls so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelStore for MemoryStore {
    fn load(
        &self,
        location: Location,
        artifact_key: &str,
    ) -> Result<Arc<dyn Regressor>, ModelStoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.models
            .get(&(location, artifact_key.to_string()))
            .cloned()
            .ok_or_else(|| ModelStoreError::NotFound {
                location,
                artifact_key: artifact_key.to_string(),
                searched: PathBuf::from("<memory>"),
            })
    }
}
