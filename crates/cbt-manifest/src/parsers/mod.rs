//! Concrete manifest parsers

mod packages_config;
mod project_json;

pub use packages_config::PackagesConfigParser;
pub use project_json::ProjectJsonParser;

use crate::format::ManifestParser;

/// Every supported parser, in the order the registry folds them.
pub fn default_parsers() -> Vec<Box<dyn ManifestParser>> {
    vec![
        Box::new(PackagesConfigParser::new()),
        Box::new(ProjectJsonParser::new()),
    ]
}
