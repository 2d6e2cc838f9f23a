//! Dependency manifest parsing for the CBT module generator
//!
//! A manifest declares `(id, version)` pairs. Each supported manifest format
//! has a [`ManifestParser`] that turns a manifest file into a sequence of
//! [`PackageIdentity`] values resolved against a packages root.
//!
//! Parsers are tolerant about content and strict about markup:
//!
//! - A manifest that does not exist yields no packages.
//! - An entry without an id or version is skipped and logged.
//! - Markup that is not well formed fails with [`Error::ManifestParse`].
//!
//! # Example
//!
//! ```no_run
//! use cbt_fs::NormalizedPath;
//! use cbt_manifest::{ManifestParser, PackagesConfigParser};
//!
//! let root = NormalizedPath::new("/src/packages");
//! let manifest = NormalizedPath::new("/src/packages.config");
//! for package in PackagesConfigParser::new().parse(&root, &manifest)? {
//!     println!("{} -> {}", package.id(), package.absolute_path());
//! }
//! # Ok::<(), cbt_manifest::Error>(())
//! ```

pub mod error;
pub mod format;
pub mod package;
pub mod parsers;

pub use error::{Error, Result};
pub use format::{ManifestFormat, ManifestParser};
pub use package::PackageIdentity;
pub use parsers::{PackagesConfigParser, ProjectJsonParser, default_parsers};
