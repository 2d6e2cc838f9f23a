//! Generator settings
//!
//! Settings mirror the parameters the build orchestrator passes to the
//! generator. They can be read from a TOML file; every key is optional.
//!
//! ```toml
//! config-path = "CBT/Module/module.config"
//! property-name-prefix = "CBTModule_"
//! property-value-prefix = "$(NuGetPackagesPath)/"
//! import-relative-paths = ["CBT/Module/$(MSBuildThisFile)"]
//! before-imports = ["build/before.props"]
//! after-imports = []
//! key-mode = "id"
//! scan-threads = 4
//! ```

use cbt_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::RegistryKeyMode;

/// Module config path, relative to a module root
pub const DEFAULT_MODULE_CONFIG_PATH: &str = "CBT/Module/module.config";

/// Prefix of the per-module property names
pub const DEFAULT_PROPERTY_NAME_PREFIX: &str = "CBTModule_";

/// Expanded by the build host to the name of the importing fragment
pub const THIS_FILE_PLACEHOLDER: &str = "$(MSBuildThisFile)";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Path of each module's own config, relative to the module root.
    pub config_path: String,
    pub property_name_prefix: String,
    /// Prefix of property values and import paths. Defaults to the packages
    /// root with a trailing separator.
    pub property_value_prefix: Option<String>,
    /// Imports emitted for every module, relative to the module root.
    pub import_relative_paths: Vec<String>,
    pub before_imports: Vec<String>,
    pub after_imports: Vec<String>,
    pub key_mode: RegistryKeyMode,
    /// Worker threads for extension discovery. `None` lets rayon decide.
    pub scan_threads: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_MODULE_CONFIG_PATH.to_string(),
            property_name_prefix: DEFAULT_PROPERTY_NAME_PREFIX.to_string(),
            property_value_prefix: None,
            import_relative_paths: vec![format!("CBT/Module/{THIS_FILE_PLACEHOLDER}")],
            before_imports: Vec::new(),
            after_imports: Vec::new(),
            key_mode: RegistryKeyMode::default(),
            scan_threads: None,
        }
    }
}

impl GeneratorConfig {
    /// Load settings from a TOML file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = cbt_fs::io::read_text(path)?;
        Self::parse(&content).map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            message,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// The value prefix in effect for a packages root.
    pub fn value_prefix_for(&self, packages_root: &NormalizedPath) -> String {
        match &self.property_value_prefix {
            Some(prefix) => prefix.clone(),
            None => packages_root.to_dir_prefix(),
        }
    }
}
