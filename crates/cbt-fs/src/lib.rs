//! Filesystem primitives for the CBT module generator
//!
//! Provides forward-slash path handling and atomic fragment writes.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::{NormalizedPath, is_plain_file_name};
