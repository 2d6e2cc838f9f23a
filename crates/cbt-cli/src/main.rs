//! cbt-modules: resolve CBT build modules and emit their import fragments

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cbt_fs::NormalizedPath;

use cli::{Cli, Commands};
use commands::{GenerateArgs, run_extensions, run_generate, run_list};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    execute_command(cli.command)
}

/// Logs go to stderr so `list --json` output stays parseable.
fn init_tracing(verbose: bool) -> Result<()> {
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| e.to_string())
    };
    installed.map_err(|e| CliError::user(format!("failed to install logger: {e}")))?;
    if verbose {
        tracing::debug!("Verbose mode enabled");
    }
    Ok(())
}

fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            source,
            imports_file,
            extensions_path,
            config_path,
            property_name_prefix,
            property_value_prefix,
            import_relative_paths,
            before_imports,
            after_imports,
        } => run_generate(
            &source,
            GenerateArgs {
                imports_file: NormalizedPath::new(imports_file),
                extensions_path: NormalizedPath::new(extensions_path),
                config_path,
                property_name_prefix,
                property_value_prefix,
                import_relative_paths,
                before_imports,
                after_imports,
            },
        ),
        Commands::List { source, json } => run_list(&source, json),
        Commands::Extensions {
            source,
            config_path,
        } => run_extensions(&source, config_path),
    }
}
