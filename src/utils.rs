use crate::error::DatasetError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "irradiance_grid_cache";

/// Default response cache directory inside the system cache directory.
pub fn get_cache_dir() -> Result<PathBuf, DatasetError> {
    dirs::cache_dir()
        .ok_or(DatasetError::CacheDirResolution)
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> Result<(), DatasetError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(DatasetError::CacheDirNotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| DatasetError::CacheDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(DatasetError::CacheDirCreation(path.to_path_buf(), e)),
    }
}
