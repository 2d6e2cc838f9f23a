//! Error types for cbt-core

use std::path::PathBuf;

/// Result type for cbt-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// An extension fragment that could not be written.
#[derive(Debug)]
pub struct ExtensionWriteFailure {
    pub name: String,
    pub source: cbt_fs::Error,
}

/// Errors that can occur in cbt-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input is missing or empty
    #[error("Invalid argument `{name}`: {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// The packages root does not exist
    #[error("Packages directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A fragment could not be serialized
    #[error("Failed to render fragment: {message}")]
    FragmentRender { message: String },

    /// One or more extension fragments could not be written
    #[error(
        "Failed to write {} extension fragment(s): {}",
        .failures.len(),
        describe_failures(.failures)
    )]
    ExtensionWriteFailed { failures: Vec<ExtensionWriteFailure> },

    /// The extension scan thread pool could not be created
    #[error("Failed to start extension scan: {message}")]
    ScanPool { message: String },

    /// Generator settings file could not be parsed
    #[error("Failed to parse settings at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from cbt-fs
    #[error(transparent)]
    Fs(#[from] cbt_fs::Error),

    /// Manifest error from cbt-manifest
    #[error(transparent)]
    Manifest(#[from] cbt_manifest::Error),
}

impl Error {
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

fn describe_failures(failures: &[ExtensionWriteFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.name, f.source))
        .collect::<Vec<_>>()
        .join(", ")
}
