//! [`TestPackages`] builder for generator test scenarios.

use cbt_fs::NormalizedPath;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Name of the packages directory created inside the fixture root.
pub const PACKAGES_DIR: &str = "packages";

/// A temporary source tree with a `packages/` directory, plus helpers to
/// write manifests and fake restored modules.
///
/// # Example
///
/// ```rust,no_run
/// use cbt_test_utils::TestPackages;
///
/// let fixture = TestPackages::new();
/// let manifest = fixture.packages_config("packages.config", &[("PackageA", "1.0.0")]);
/// fixture.module_config("PackageA", "1.0.0", &["Custom.targets"]);
/// assert!(manifest.is_file());
/// ```
pub struct TestPackages {
    temp_dir: TempDir,
}

impl Default for TestPackages {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPackages {
    /// Create a temporary root with an empty `packages/` directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(PACKAGES_DIR))
            .unwrap_or_else(|e| panic!("TestPackages::new: failed to create packages dir: {e}"));
        Self { temp_dir }
    }

    /// Root of the temporary tree.
    pub fn root(&self) -> NormalizedPath {
        NormalizedPath::new(self.temp_dir.path())
    }

    /// The `packages/` directory.
    pub fn packages_root(&self) -> NormalizedPath {
        self.root().join(PACKAGES_DIR)
    }

    /// Native path of a file relative to the root.
    pub fn path(&self, relative: &str) -> NormalizedPath {
        self.root().join(relative)
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> NormalizedPath {
        let path = self.path(relative);
        write_file(&path.to_native(), content);
        path
    }

    /// Read a file relative to the root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative).to_native();
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestPackages::read: {}: {e}", path.display()))
    }

    /// Write a `packages.config` manifest listing `(id, version)` pairs.
    pub fn packages_config(&self, relative: &str, packages: &[(&str, &str)]) -> NormalizedPath {
        let mut content = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<packages>\n");
        for (id, version) in packages {
            content.push_str(&format!(
                "  <package id=\"{id}\" version=\"{version}\" targetFramework=\"net46\" />\n"
            ));
        }
        content.push_str("</packages>\n");
        self.write(relative, &content)
    }

    /// Write a `project.json` manifest with a top-level `dependencies` object.
    pub fn project_json(&self, relative: &str, packages: &[(&str, &str)]) -> NormalizedPath {
        let entries = packages
            .iter()
            .map(|(id, version)| format!("    \"{id}\": \"{version}\""))
            .collect::<Vec<_>>()
            .join(",\n");
        let content = format!("{{\n  \"dependencies\": {{\n{entries}\n  }}\n}}\n");
        self.write(relative, &content)
    }

    /// Create the restored directory for a module and return it.
    pub fn install_module(&self, id: &str, version: &str) -> NormalizedPath {
        let dir = self.packages_root().join(&format!("{id}.{version}"));
        fs::create_dir_all(dir.to_native())
            .unwrap_or_else(|e| panic!("TestPackages::install_module: {dir}: {e}"));
        dir
    }

    /// Write a file inside a module directory.
    pub fn module_file(&self, id: &str, version: &str, relative: &str, content: &str) -> NormalizedPath {
        let path = self.install_module(id, version).join(relative);
        write_file(&path.to_native(), content);
        path
    }

    /// Write a module's `CBT/Module/module.config` declaring extension imports.
    pub fn module_config(&self, id: &str, version: &str, extensions: &[&str]) -> NormalizedPath {
        let mut content =
            String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n  <extensionImports>\n");
        for name in extensions {
            content.push_str(&format!("    <add name=\"{name}\" />\n"));
        }
        content.push_str("  </extensionImports>\n</configuration>\n");
        self.module_file(id, version, "CBT/Module/module.config", &content)
    }

    /// Assert that a file exists relative to the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the file does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.is_file(), "Expected file to exist: {path}");
    }

    /// Assert that a file does not exist relative to the root.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(!path.exists(), "Expected file to NOT exist: {path}");
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("TestPackages: failed to create {}: {e}", parent.display()));
    }
    fs::write(path, content)
        .unwrap_or_else(|e| panic!("TestPackages: failed to write {}: {e}", path.display()));
}
