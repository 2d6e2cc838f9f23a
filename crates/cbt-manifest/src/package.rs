//! Resolved package identities

use cbt_fs::NormalizedPath;

/// A dependency resolved to its on-disk location under a packages root.
///
/// Packages are restored into `{packages_root}/{id}.{version}`; the relative
/// part is kept separately because generated fragments refer to modules
/// through a configurable prefix rather than the absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity {
    id: String,
    version: String,
    relative_path: String,
    absolute_path: NormalizedPath,
}

impl PackageIdentity {
    pub fn new(
        packages_root: &NormalizedPath,
        id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let version = version.into();
        let relative_path = format!("{id}.{version}");
        let absolute_path = packages_root.join(&relative_path);
        Self {
            id,
            version,
            relative_path,
            absolute_path,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `{id}.{version}`, relative to the packages root.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn absolute_path(&self) -> &NormalizedPath {
        &self.absolute_path
    }
}

impl std::fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}
