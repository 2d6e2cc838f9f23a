//! Package registry built from dependency manifests
//!
//! The registry is the result of folding every manifest through every
//! parser: `manifests × parsers → packages`, keyed case-insensitively. When
//! two entries share a key the later one replaces the earlier one in place,
//! so the registry keeps the position of the first occurrence and the value
//! of the last.

use cbt_fs::NormalizedPath;
use cbt_manifest::{ManifestParser, PackageIdentity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How registry keys are derived from a package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryKeyMode {
    /// One entry per package id
    #[default]
    Id,
    /// One entry per `{id}.{version}`, so several versions can coexist
    IdAndVersion,
}

impl RegistryKeyMode {
    /// Registry key for a package, folded for case-insensitive lookup.
    pub fn key_for(&self, package: &PackageIdentity) -> String {
        match self {
            Self::Id => fold_key(package.id()),
            Self::IdAndVersion => fold_key(package.relative_path()),
        }
    }
}

fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

/// Resolved modules, in manifest fold order.
#[derive(Debug, Clone)]
pub struct PackageRegistry {
    packages_root: NormalizedPath,
    key_mode: RegistryKeyMode,
    packages: IndexMap<String, PackageIdentity>,
}

impl PackageRegistry {
    /// Build a registry from manifests.
    ///
    /// Fails before reading any manifest if `packages_root` is empty or does
    /// not exist. A manifest that fails to parse aborts the build; no
    /// partial registry is returned.
    pub fn build(
        packages_root: &NormalizedPath,
        manifests: &[NormalizedPath],
        parsers: &[Box<dyn ManifestParser>],
        key_mode: RegistryKeyMode,
    ) -> Result<Self> {
        validate_packages_root(packages_root)?;

        let packages = manifests
            .iter()
            .flat_map(|manifest| parsers.iter().map(move |parser| (manifest, parser)))
            .try_fold(IndexMap::new(), |mut packages, (manifest, parser)| {
                for package in parser.parse(packages_root, manifest)? {
                    let key = key_mode.key_for(&package);
                    if let Some(previous) = packages.get(&key) {
                        tracing::debug!(
                            %key,
                            replaced = %previous,
                            by = %package,
                            %manifest,
                            "Later manifest entry replaces package"
                        );
                    }
                    packages.insert(key, package);
                }
                Ok::<_, Error>(packages)
            })?;

        tracing::debug!(
            root = %packages_root,
            manifests = manifests.len(),
            modules = packages.len(),
            "Built package registry"
        );

        Ok(Self {
            packages_root: packages_root.clone(),
            key_mode,
            packages,
        })
    }

    pub fn packages_root(&self) -> &NormalizedPath {
        &self.packages_root
    }

    pub fn key_mode(&self) -> RegistryKeyMode {
        self.key_mode
    }

    /// Look up a package by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&PackageIdentity> {
        self.packages.get(&fold_key(key))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over packages in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &PackageIdentity> {
        self.packages.values()
    }

    /// Absolute module directories in registry order.
    pub fn module_paths(&self) -> Vec<&NormalizedPath> {
        self.iter().map(PackageIdentity::absolute_path).collect()
    }
}

/// Check that a packages root was given and exists on disk.
pub fn validate_packages_root(packages_root: &NormalizedPath) -> Result<()> {
    if packages_root.as_str().trim().is_empty() {
        return Err(Error::invalid_argument(
            "packages_root",
            "a packages directory is required",
        ));
    }
    if !packages_root.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: packages_root.to_native(),
        });
    }
    Ok(())
}
