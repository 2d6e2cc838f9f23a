//! Module registry and build fragment generation for CBT
//!
//! This crate resolves the modules named by dependency manifests and emits
//! the build fragments that pull each module's build logic into the host
//! build:
//!
//! - **Registry**: manifests × parsers folded into one keyed, ordered
//!   collection of modules
//! - **Fragments**: property blocks and existence-guarded imports rendered
//!   as MSBuild XML
//! - **Extensions**: concurrent discovery of the named import points modules
//!   register into
//! - **Generator**: one run that writes the primary fragment and every
//!   extension fragment
//!
//! # Architecture
//!
//! ```text
//!                  cbt-cli
//!                     |
//!                 cbt-core
//!                     |
//!          +----------+----------+
//!          |                     |
//!       cbt-fs              cbt-manifest
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cbt_core::{GeneratorConfig, ModulePropertyGenerator};
//! use cbt_fs::NormalizedPath;
//!
//! let generator = ModulePropertyGenerator::new(
//!     &NormalizedPath::new("/src/packages"),
//!     &[NormalizedPath::new("/src/packages.config")],
//!     GeneratorConfig::default(),
//! )?;
//! let report = generator.generate(
//!     &NormalizedPath::new("/src/obj/modules.props"),
//!     &NormalizedPath::new("/src/obj/Extensions"),
//! )?;
//! println!("{} modules", report.modules);
//! # Ok::<(), cbt_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod extensions;
pub mod fragment;
pub mod generator;
pub mod registry;

pub use config::{
    DEFAULT_MODULE_CONFIG_PATH, DEFAULT_PROPERTY_NAME_PREFIX, GeneratorConfig,
    THIS_FILE_PLACEHOLDER,
};
pub use error::{Error, ExtensionWriteFailure, Result};
pub use extensions::{ExtensionAggregator, ExtensionMap, parse_extension_imports};
pub use fragment::{Fragment, Import, Property};
pub use generator::{
    ALL_MODULES_PROPERTY, GenerationReport, ModulePropertyGenerator, TRACKING_PROPERTY,
    TRACKING_VALUE, WrittenExtension, property_name,
};
pub use registry::{PackageRegistry, RegistryKeyMode, validate_packages_root};
