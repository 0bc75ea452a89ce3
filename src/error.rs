use crate::config::ConfigError;
use crate::mapping::MappingError;
use crate::power::error::PowerApiError;
use crate::writer::error::WriterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    PowerApi(#[from] PowerApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Cache path '{0}' exists but is not a directory")]
    CacheDirNotADirectory(PathBuf),

    #[error("Failed to determine cache directory")]
    CacheDirResolution,
}
