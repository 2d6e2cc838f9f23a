//! Manifest format detection and the parser capability trait

use std::io::ErrorKind;

use cbt_fs::NormalizedPath;

use crate::error::{Error, Result};
use crate::package::PackageIdentity;

/// Supported manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFormat {
    /// Flat list of `<package id=".." version=".." />` elements
    PackagesConfig,
    /// JSON object with a nested `dependencies` member
    ProjectJson,
}

impl ManifestFormat {
    /// Detect the format of a manifest from its file extension
    pub fn detect(path: &NormalizedPath) -> Option<Self> {
        match path.extension()?.to_lowercase().as_str() {
            "config" | "xml" => Some(Self::PackagesConfig),
            "json" => Some(Self::ProjectJson),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PackagesConfig => "packages.config",
            Self::ProjectJson => "project.json",
        }
    }
}

impl std::fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for format-specific manifest parsers.
///
/// The registry visits every parser for every manifest, so a parser must
/// return an empty sequence for a manifest it does not understand or that
/// does not exist.
pub trait ManifestParser: Send + Sync {
    /// Format this parser reads
    fn format(&self) -> ManifestFormat;

    /// Whether this parser reads the given manifest
    fn accepts(&self, manifest: &NormalizedPath) -> bool {
        ManifestFormat::detect(manifest) == Some(self.format())
    }

    /// Parse a manifest into packages resolved against `packages_root`
    fn parse(
        &self,
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
    ) -> Result<Vec<PackageIdentity>>;
}

/// Read a manifest this parser accepts, or `None` when there is nothing to read.
pub(crate) fn read_manifest(
    parser: &dyn ManifestParser,
    manifest: &NormalizedPath,
) -> Result<Option<String>> {
    if !parser.accepts(manifest) {
        return Ok(None);
    }
    if !manifest.is_file() {
        tracing::debug!(%manifest, format = %parser.format(), "Manifest not found, skipping");
        return Ok(None);
    }
    match cbt_fs::io::read_text(manifest) {
        Ok(source) => Ok(Some(source)),
        Err(cbt_fs::Error::Io { path, source }) if source.kind() == ErrorKind::InvalidData => {
            Err(Error::parse(path, parser.format(), "manifest is not valid UTF-8"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Build a package from raw attribute values, or log and drop the entry.
pub(crate) fn package_from_entry(
    packages_root: &NormalizedPath,
    manifest: &NormalizedPath,
    id: Option<&str>,
    version: Option<&str>,
) -> Option<PackageIdentity> {
    let id = id.map(str::trim).filter(|s| !s.is_empty());
    let version = version.map(str::trim).filter(|s| !s.is_empty());
    match (id, version) {
        (Some(id), Some(version)) => Some(PackageIdentity::new(packages_root, id, version)),
        (id, version) => {
            tracing::debug!(
                %manifest,
                id = id.unwrap_or(""),
                version = version.unwrap_or(""),
                "Skipping manifest entry without id or version"
            );
            None
        }
    }
}
