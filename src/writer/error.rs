use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode dataset bundle")]
    Encode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to decode dataset bundle '{0}'")]
    Decode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to compress dataset bundle")]
    Compression(#[source] std::io::Error),

    #[error("Failed to write temporary bundle file in '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to move finished bundle to '{0}'")]
    Persist(PathBuf, #[source] tempfile::PersistError),

    #[error("Failed to read dataset bundle '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Dataset bundle '{path}' has no array named '{name}'")]
    MissingArray { path: PathBuf, name: &'static str },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
