//! Error types for cbt-manifest

use std::path::PathBuf;

use crate::format::ManifestFormat;

/// Result type for cbt-manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} manifest at {path}: {message}")]
    ManifestParse {
        path: PathBuf,
        format: ManifestFormat,
        message: String,
    },

    #[error(transparent)]
    Fs(#[from] cbt_fs::Error),
}

impl Error {
    pub fn parse(
        path: impl Into<PathBuf>,
        format: ManifestFormat,
        message: impl Into<String>,
    ) -> Self {
        Self::ManifestParse {
            path: path.into(),
            format,
            message: message.into(),
        }
    }
}
