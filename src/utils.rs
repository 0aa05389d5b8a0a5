use crate::error::ForecastError;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "hyperlocal_weather";
const MODEL_DIR_NAME: &str = "models";

/// The default artifact root: `<data dir>/hyperlocal_weather/models`.
pub fn get_model_dir() -> io::Result<PathBuf> {
    dirs::data_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system data directory",
            )
        })
        .map(|p| p.join(DATA_DIR_NAME).join(MODEL_DIR_NAME))
}

/// Checks that `path` exists and is a directory. Artifacts are never created
/// here, so a missing directory is an error.
pub async fn ensure_model_dir_exists(path: &Path) -> Result<(), ForecastError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ForecastError::ModelDir(path.to_path_buf(), e))?;
    if !metadata.is_dir() {
        return Err(ForecastError::ModelDirNotADirectory(path.to_path_buf()));
    }
    Ok(())
}
