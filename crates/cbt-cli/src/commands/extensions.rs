//! Extensions command implementation

use colored::Colorize;

use cbt_core::ExtensionAggregator;

use super::{build_registry, load_config};
use crate::cli::SourceArgs;
use crate::error::Result;

/// Run the extensions command
///
/// Prints each extension name with the module that declares it.
pub fn run_extensions(source: &SourceArgs, config_path: Option<String>) -> Result<()> {
    let mut config = load_config(source)?;
    if let Some(config_path) = config_path {
        config.config_path = config_path;
    }
    let registry = build_registry(source, &config)?;

    let extensions = ExtensionAggregator::new(&registry, &config.config_path)
        .with_threads(config.scan_threads)
        .discover()?;

    if extensions.is_empty() {
        println!("{}", "No extension imports declared.".dimmed());
        return Ok(());
    }

    println!("{}", "Extension imports:".bold());
    for (name, owner) in &extensions {
        println!("  {:<40} {}", name.green(), owner);
    }

    Ok(())
}
