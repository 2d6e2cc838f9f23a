//! Generate command implementation

use colored::Colorize;

use cbt_core::ModulePropertyGenerator;
use cbt_fs::NormalizedPath;

use super::{load_config, manifest_paths};
use crate::cli::SourceArgs;
use crate::error::Result;

/// Output locations and overrides for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub imports_file: NormalizedPath,
    pub extensions_path: NormalizedPath,
    pub config_path: Option<String>,
    pub property_name_prefix: Option<String>,
    pub property_value_prefix: Option<String>,
    pub import_relative_paths: Vec<String>,
    pub before_imports: Vec<String>,
    pub after_imports: Vec<String>,
}

/// Run the generate command
///
/// Command-line values replace the settings file's; list options replace
/// the settings list only when at least one value is given.
pub fn run_generate(source: &SourceArgs, args: GenerateArgs) -> Result<()> {
    let mut config = load_config(source)?;

    if let Some(config_path) = args.config_path {
        config.config_path = config_path;
    }
    if let Some(prefix) = args.property_name_prefix {
        config.property_name_prefix = prefix;
    }
    if args.property_value_prefix.is_some() {
        config.property_value_prefix = args.property_value_prefix;
    }
    if !args.import_relative_paths.is_empty() {
        config.import_relative_paths = args.import_relative_paths;
    }
    if !args.before_imports.is_empty() {
        config.before_imports = args.before_imports;
    }
    if !args.after_imports.is_empty() {
        config.after_imports = args.after_imports;
    }

    let generator = ModulePropertyGenerator::new(
        &NormalizedPath::new(&source.packages_path),
        &manifest_paths(source),
        config,
    )?;
    let report = generator.generate(&args.imports_file, &args.extensions_path)?;

    println!(
        "{} Wrote {} ({} modules)",
        "=>".blue().bold(),
        report.primary.as_str().cyan(),
        report.modules
    );
    for extension in &report.extensions {
        println!(
            "   {} {} {}",
            extension.name.green(),
            format!("from {}", extension.owner).dimmed(),
            extension.path
        );
    }

    Ok(())
}
