//! Module property generation
//!
//! [`ModulePropertyGenerator`] turns a package registry into the build
//! fragments the host imports:
//!
//! - the primary fragment: a property per module, a listing of all modules,
//!   and a guarded import of every module's build logic, framed by the
//!   before/after imports;
//! - one extension fragment per discovered extension name, carrying the same
//!   import list without properties.

use cbt_fs::NormalizedPath;
use cbt_manifest::{ManifestParser, PackageIdentity, default_parsers};

use crate::config::GeneratorConfig;
use crate::error::{Error, ExtensionWriteFailure, Result};
use crate::extensions::{ExtensionAggregator, ExtensionMap};
use crate::fragment::Fragment;
use crate::registry::PackageRegistry;

/// Property the host uses to track files that affect the build
pub const TRACKING_PROPERTY: &str = "MSBuildAllProjects";

/// Value of [`TRACKING_PROPERTY`]: the previous list plus this fragment
pub const TRACKING_VALUE: &str = "$(MSBuildAllProjects);$(MSBuildThisFileFullPath)";

/// Property listing every module as `id=path`, `;`-separated
pub const ALL_MODULES_PROPERTY: &str = "CBTAllModulePaths";

/// An extension fragment written by a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenExtension {
    pub name: String,
    pub owner: String,
    pub path: NormalizedPath,
}

/// Outcome of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub primary: NormalizedPath,
    pub modules: usize,
    pub extensions: Vec<WrittenExtension>,
}

/// Generates module property fragments from dependency manifests.
#[derive(Debug)]
pub struct ModulePropertyGenerator {
    registry: PackageRegistry,
    config: GeneratorConfig,
}

impl ModulePropertyGenerator {
    /// Validate the packages root and build the registry with every
    /// supported manifest parser.
    pub fn new(
        packages_root: &NormalizedPath,
        manifests: &[NormalizedPath],
        config: GeneratorConfig,
    ) -> Result<Self> {
        Self::with_parsers(packages_root, manifests, &default_parsers(), config)
    }

    pub fn with_parsers(
        packages_root: &NormalizedPath,
        manifests: &[NormalizedPath],
        parsers: &[Box<dyn ManifestParser>],
        config: GeneratorConfig,
    ) -> Result<Self> {
        let registry = PackageRegistry::build(packages_root, manifests, parsers, config.key_mode)?;
        Ok(Self::from_registry(registry, config))
    }

    pub fn from_registry(registry: PackageRegistry, config: GeneratorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn value_prefix(&self) -> String {
        self.config.value_prefix_for(self.registry.packages_root())
    }

    /// `{value_prefix}{id}.{version}` for a module.
    fn module_value(&self, prefix: &str, package: &PackageIdentity) -> String {
        NormalizedPath::new(format!("{prefix}{}", package.relative_path()))
            .as_str()
            .to_string()
    }

    /// Name of the property for a module; `.` is not legal in property names.
    pub fn property_name(&self, package: &PackageIdentity) -> String {
        property_name(&self.config.property_name_prefix, package.id())
    }

    /// Build the primary fragment: properties, then imports.
    pub fn primary_fragment(&self) -> Fragment {
        let prefix = self.value_prefix();
        let mut fragment = Fragment::new();

        fragment.add_property(TRACKING_PROPERTY, TRACKING_VALUE);

        let mut listing = Vec::with_capacity(self.registry.len());
        for package in self.registry.iter() {
            let value = self.module_value(&prefix, package);
            listing.push(format!("{}={value}", package.id()));
            fragment.add_property(self.property_name(package), value);
        }
        fragment.add_property(ALL_MODULES_PROPERTY, listing.join(";"));

        self.append_imports(&mut fragment, &prefix);
        fragment
    }

    /// Build an extension fragment: the primary import list, no properties.
    pub fn extension_fragment(&self) -> Fragment {
        let mut fragment = Fragment::new();
        self.append_imports(&mut fragment, &self.value_prefix());
        fragment
    }

    /// Before-imports, then each module × each relative import path, then
    /// after-imports.
    fn append_imports(&self, fragment: &mut Fragment, prefix: &str) {
        fragment.add_guarded_imports(self.config.before_imports.iter().cloned());

        for package in self.registry.iter() {
            let module_root = NormalizedPath::new(self.module_value(prefix, package));
            fragment.add_guarded_imports(
                self.config
                    .import_relative_paths
                    .iter()
                    .map(|relative| module_root.join(relative).as_str().to_string()),
            );
        }

        fragment.add_guarded_imports(self.config.after_imports.iter().cloned());
    }

    /// Scan module configs for extension import declarations.
    pub fn discover_extensions(&self) -> Result<ExtensionMap> {
        ExtensionAggregator::new(&self.registry, &self.config.config_path)
            .with_threads(self.config.scan_threads)
            .discover()
    }

    /// Write the primary fragment to `output_path` and one extension fragment
    /// per discovered extension into `extensions_path`.
    ///
    /// A failed primary write aborts the run. Extension fragments are written
    /// independently; if any fail, the rest are still written and the run
    /// fails with [`Error::ExtensionWriteFailed`].
    pub fn generate(
        &self,
        output_path: &NormalizedPath,
        extensions_path: &NormalizedPath,
    ) -> Result<GenerationReport> {
        if output_path.as_str().trim().is_empty() {
            return Err(Error::invalid_argument("output_path", "an output file is required"));
        }
        if extensions_path.as_str().trim().is_empty() {
            return Err(Error::invalid_argument(
                "extensions_path",
                "an extensions directory is required",
            ));
        }

        let primary = self.primary_fragment().render()?;
        cbt_fs::io::write_text(output_path, &primary)?;
        tracing::info!(
            path = %output_path,
            modules = self.registry.len(),
            "Wrote module properties"
        );

        let extensions = self.discover_extensions()?;
        let written = if extensions.is_empty() {
            Vec::new()
        } else {
            self.write_extensions(extensions, extensions_path)?
        };

        Ok(GenerationReport {
            primary: output_path.clone(),
            modules: self.registry.len(),
            extensions: written,
        })
    }

    fn write_extensions(
        &self,
        extensions: ExtensionMap,
        extensions_path: &NormalizedPath,
    ) -> Result<Vec<WrittenExtension>> {
        let content = self.extension_fragment().render()?;
        let mut written = Vec::with_capacity(extensions.len());
        let mut failures = Vec::new();

        for (name, owner) in extensions {
            let path = extensions_path.join(name.trim());
            match cbt_fs::io::write_text(&path, &content) {
                Ok(()) => {
                    tracing::info!(
                        extension = %name,
                        %owner,
                        path = %path,
                        "Wrote extension imports"
                    );
                    written.push(WrittenExtension { name, owner, path });
                }
                Err(source) => {
                    tracing::warn!(
                        extension = %name,
                        error = %source,
                        "Failed to write extension imports"
                    );
                    failures.push(ExtensionWriteFailure { name, source });
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(Error::ExtensionWriteFailed { failures })
        }
    }
}

/// `{prefix}{id}` with every `.` replaced by `_`.
pub fn property_name(prefix: &str, id: &str) -> String {
    format!("{prefix}{}", id.replace('.', "_"))
}
