//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CBT module generator - resolve build modules and emit their import fragments
#[derive(Parser, Debug)]
#[command(name = "cbt-modules")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Where modules come from
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SourceArgs {
    /// Directory packages are restored into
    #[arg(long, value_name = "DIR", env = "CBT_PACKAGES_PATH")]
    pub packages_path: PathBuf,

    /// Dependency manifest (packages.config or project.json); repeat or separate with ';'
    #[arg(long = "package-config", value_name = "FILE", required = true, value_delimiter = ';')]
    pub package_configs: Vec<PathBuf>,

    /// Key modules by id and version instead of id
    #[arg(long)]
    pub key_by_version: bool,

    /// TOML settings file; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate the module properties file and extension import files
    ///
    /// Examples:
    ///   cbt-modules generate --packages-path packages \
    ///       --package-config src/packages.config \
    ///       --imports-file obj/modules.props --extensions-path obj/Extensions
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Primary output file
        #[arg(long, value_name = "FILE")]
        imports_file: PathBuf,

        /// Directory for extension import files
        #[arg(long, value_name = "DIR")]
        extensions_path: PathBuf,

        /// Module config path, relative to each module
        #[arg(long, value_name = "PATH")]
        config_path: Option<String>,

        /// Prefix of per-module property names
        #[arg(long, value_name = "PREFIX")]
        property_name_prefix: Option<String>,

        /// Prefix of property values and import paths (default: packages path)
        #[arg(long, value_name = "PREFIX")]
        property_value_prefix: Option<String>,

        /// Import path relative to each module; repeatable
        #[arg(long = "import-relative-path", value_name = "PATH", value_delimiter = ';')]
        import_relative_paths: Vec<String>,

        /// Import placed before all module imports; repeatable
        #[arg(long = "before-import", value_name = "PATH", value_delimiter = ';')]
        before_imports: Vec<String>,

        /// Import placed after all module imports; repeatable
        #[arg(long = "after-import", value_name = "PATH", value_delimiter = ';')]
        after_imports: Vec<String>,
    },

    /// List resolved modules in registry order
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List extension imports declared by modules
    Extensions {
        #[command(flatten)]
        source: SourceArgs,

        /// Module config path, relative to each module
        #[arg(long, value_name = "PATH")]
        config_path: Option<String>,
    },
}
