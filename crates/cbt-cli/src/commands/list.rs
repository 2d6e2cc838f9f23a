//! List command implementation

use colored::Colorize;
use serde::Serialize;

use super::{build_registry, load_config};
use crate::cli::SourceArgs;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ModuleEntry<'a> {
    id: &'a str,
    version: &'a str,
    path: &'a str,
}

/// Run the list command
///
/// Prints every resolved module in registry order.
pub fn run_list(source: &SourceArgs, json: bool) -> Result<()> {
    let config = load_config(source)?;
    let registry = build_registry(source, &config)?;

    let entries: Vec<ModuleEntry<'_>> = registry
        .iter()
        .map(|package| ModuleEntry {
            id: package.id(),
            version: package.version(),
            path: package.absolute_path().as_str(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No modules found.".dimmed());
        return Ok(());
    }

    println!("{}", "Modules:".bold());
    for entry in &entries {
        println!(
            "  {:<32} {:<14} {}",
            entry.id.cyan(),
            entry.version,
            entry.path.dimmed()
        );
    }
    println!();
    println!("{} modules", entries.len());

    Ok(())
}
