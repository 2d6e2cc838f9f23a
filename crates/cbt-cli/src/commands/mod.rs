//! Command implementations

pub mod extensions;
pub mod generate;
pub mod list;

use cbt_core::{GeneratorConfig, PackageRegistry, RegistryKeyMode};
use cbt_fs::NormalizedPath;

use crate::cli::SourceArgs;
use crate::error::Result;

pub use extensions::run_extensions;
pub use generate::{GenerateArgs, run_generate};
pub use list::run_list;

/// Load the settings file if one was given, then apply the source flags.
pub(crate) fn load_config(source: &SourceArgs) -> Result<GeneratorConfig> {
    let mut config = match &source.settings {
        Some(path) => GeneratorConfig::load(&NormalizedPath::new(path))?,
        None => GeneratorConfig::default(),
    };
    if source.key_by_version {
        config.key_mode = RegistryKeyMode::IdAndVersion;
    }
    Ok(config)
}

pub(crate) fn manifest_paths(source: &SourceArgs) -> Vec<NormalizedPath> {
    source.package_configs.iter().map(NormalizedPath::new).collect()
}

pub(crate) fn build_registry(
    source: &SourceArgs,
    config: &GeneratorConfig,
) -> Result<PackageRegistry> {
    let registry = PackageRegistry::build(
        &NormalizedPath::new(&source.packages_path),
        &manifest_paths(source),
        &cbt_manifest::default_parsers(),
        config.key_mode,
    )?;
    Ok(registry)
}
