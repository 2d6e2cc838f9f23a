//! `project.json` parser

use cbt_fs::NormalizedPath;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::format::{ManifestFormat, ManifestParser, package_from_entry, read_manifest};
use crate::package::PackageIdentity;

const DEPENDENCIES_KEY: &str = "dependencies";
const FRAMEWORKS_KEY: &str = "frameworks";

/// Parser for nested dependency-object manifests.
///
/// Reads the top-level `dependencies` object followed by each framework's
/// `dependencies` object under `frameworks`. A dependency value is either a
/// version string or an object with a `version` member.
#[derive(Debug, Default)]
pub struct ProjectJsonParser;

impl ProjectJsonParser {
    pub fn new() -> Self {
        Self
    }

    fn version_of(value: &Value) -> Option<&str> {
        match value {
            Value::String(version) => Some(version),
            Value::Object(spec) => spec.get("version").and_then(Value::as_str),
            _ => None,
        }
    }

    fn collect(
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
        dependencies: &Map<String, Value>,
        packages: &mut Vec<PackageIdentity>,
    ) {
        packages.extend(dependencies.iter().filter_map(|(id, value)| {
            package_from_entry(packages_root, manifest, Some(id.as_str()), Self::version_of(value))
        }));
    }

    /// Parse `project.json` content.
    pub fn parse_str(
        &self,
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
        source: &str,
    ) -> Result<Vec<PackageIdentity>> {
        let invalid = |message: String| {
            Error::parse(manifest.to_native(), ManifestFormat::ProjectJson, message)
        };

        // Editors commonly save JSON with a byte-order mark
        let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
        let document: Value = serde_json::from_str(source).map_err(|e| invalid(e.to_string()))?;
        let Value::Object(root) = document else {
            return Err(invalid("expected a JSON object at the document root".to_string()));
        };

        let mut packages = Vec::new();

        if let Some(dependencies) = root.get(DEPENDENCIES_KEY).and_then(Value::as_object) {
            Self::collect(packages_root, manifest, dependencies, &mut packages);
        }

        if let Some(frameworks) = root.get(FRAMEWORKS_KEY).and_then(Value::as_object) {
            for (framework, section) in frameworks {
                if let Some(dependencies) = section.get(DEPENDENCIES_KEY).and_then(Value::as_object)
                {
                    tracing::debug!(%manifest, framework, "Reading framework dependencies");
                    Self::collect(packages_root, manifest, dependencies, &mut packages);
                }
            }
        }

        tracing::debug!(%manifest, count = packages.len(), "Parsed project.json");
        Ok(packages)
    }
}

impl ManifestParser for ProjectJsonParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::ProjectJson
    }

    fn parse(
        &self,
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
    ) -> Result<Vec<PackageIdentity>> {
        match read_manifest(self, manifest)? {
            Some(source) => self.parse_str(packages_root, manifest, &source),
            None => Ok(Vec::new()),
        }
    }
}
