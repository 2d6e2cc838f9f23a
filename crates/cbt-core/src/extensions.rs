//! Extension import discovery
//!
//! A module may register itself into named import points besides the
//! primary fragment by declaring them in its own config:
//!
//! ```xml
//! <configuration>
//!   <extensionImports>
//!     <add name="Custom.targets" />
//!   </extensionImports>
//! </configuration>
//! ```
//!
//! Every module is scanned independently on a bounded rayon pool and the
//! declarations are merged into a shared map. A module whose config is
//! missing or malformed contributes nothing.
//!
//! Names are compared case-insensitively. When several modules declare the
//! same name the owner is the module whose id sorts first (case-insensitive,
//! then ordinal), and the fragment takes that module's spelling. The merge
//! only ever moves ownership towards that module, so the result does not
//! depend on which scan finishes first.

use std::collections::BTreeMap;

use cbt_fs::{NormalizedPath, is_plain_file_name};
use cbt_manifest::PackageIdentity;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::registry::PackageRegistry;

const SECTION_ELEMENT: &[u8] = b"extensionImports";
const ADD_ELEMENT: &[u8] = b"add";

/// Extension name → owning module id, in name order.
pub type ExtensionMap = BTreeMap<String, String>;

/// Scans the modules of a registry for declared extension imports.
#[derive(Debug)]
pub struct ExtensionAggregator<'a> {
    registry: &'a PackageRegistry,
    config_path: &'a str,
    threads: Option<usize>,
}

impl<'a> ExtensionAggregator<'a> {
    /// `config_path` is the module config path relative to each module root.
    pub fn new(registry: &'a PackageRegistry, config_path: &'a str) -> Self {
        Self {
            registry,
            config_path,
            threads: None,
        }
    }

    /// Bound the number of scan threads.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Scan every module and return once all scans have finished.
    pub fn discover(&self) -> Result<ExtensionMap> {
        let claims: DashMap<String, Claim> = DashMap::new();
        let packages: Vec<&PackageIdentity> = self.registry.iter().collect();

        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|index| format!("cbt-extension-scan-{index}"));
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build().map_err(|e| Error::ScanPool {
            message: e.to_string(),
        })?;

        pool.install(|| {
            packages.par_iter().for_each(|package| {
                for name in self.scan(package) {
                    record_owner(&claims, name, package.id());
                }
            });
        });

        let extensions: ExtensionMap = claims
            .into_iter()
            .map(|(_, claim)| (claim.name, claim.owner))
            .collect();
        tracing::debug!(
            modules = packages.len(),
            extensions = extensions.len(),
            "Extension discovery complete"
        );
        Ok(extensions)
    }

    /// Extension names declared by one module.
    fn scan(&self, package: &PackageIdentity) -> Vec<String> {
        let path = package.absolute_path().join(self.config_path);
        if !path.is_file() {
            return Vec::new();
        }

        let source = match cbt_fs::io::read_text(&path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(module = package.id(), error = %e, "Failed to read module config");
                return Vec::new();
            }
        };

        match parse_extension_imports(&source) {
            Ok(names) => names
                .into_iter()
                .filter(|name| accept_name(&path, name))
                .collect(),
            Err(message) => {
                tracing::warn!(
                    module = package.id(),
                    path = %path,
                    %message,
                    "Ignoring malformed module config"
                );
                Vec::new()
            }
        }
    }
}

fn accept_name(config: &NormalizedPath, name: &str) -> bool {
    if is_plain_file_name(name) {
        return true;
    }
    tracing::warn!(%config, name, "Ignoring extension import that is not a plain file name");
    false
}

/// A declared extension name and the module that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Claim {
    name: String,
    owner: String,
}

/// Record `owner`'s claim on `name`, keeping whichever owner sorts first.
///
/// Names are keyed case-insensitively since fragments land on filesystems
/// that may not distinguish case. The file takes the owner's spelling.
fn record_owner(claims: &DashMap<String, Claim>, name: String, owner: &str) {
    match claims.entry(name.to_lowercase()) {
        Entry::Vacant(entry) => {
            entry.insert(Claim {
                name,
                owner: owner.to_string(),
            });
        }
        Entry::Occupied(mut entry) => {
            let current = entry.get();
            if sorts_before(owner, &current.owner) {
                tracing::debug!(
                    extension = name.as_str(),
                    owner,
                    previous = current.owner.as_str(),
                    "Extension import claimed by earlier-sorting module"
                );
                entry.insert(Claim {
                    name,
                    owner: owner.to_string(),
                });
            } else if current.owner != owner || current.name != name {
                tracing::debug!(
                    extension = current.name.as_str(),
                    owner = current.owner.as_str(),
                    ignored = owner,
                    ignored_name = name.as_str(),
                    "Extension import already owned"
                );
            }
        }
    }
}

fn sorts_before(candidate: &str, current: &str) -> bool {
    (candidate.to_lowercase(), candidate) < (current.to_lowercase(), current)
}

/// Extract `<extensionImports><add name="X" /></extensionImports>` names.
///
/// Returns the parse error message for markup that is not well formed.
pub fn parse_extension_imports(source: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut names = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                collect_add(&open, &element, &mut names)?;
                open.push(element.local_name().as_ref().to_vec());
            }
            Ok(Event::Empty(element)) => collect_add(&open, &element, &mut names)?,
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("{} (at byte {})", e, reader.buffer_position())),
        }
    }

    if !open.is_empty() {
        return Err("unexpected end of document".to_string());
    }
    Ok(names)
}

fn collect_add(
    open: &[Vec<u8>],
    element: &BytesStart<'_>,
    names: &mut Vec<String>,
) -> std::result::Result<(), String> {
    let in_section = open.last().is_some_and(|parent| parent == SECTION_ELEMENT);
    if !in_section || element.local_name().as_ref() != ADD_ELEMENT {
        return Ok(());
    }

    let name = match element.try_get_attribute("name").map_err(|e| e.to_string())? {
        Some(attr) => attr.unescape_value().map_err(|e| e.to_string())?.trim().to_string(),
        None => return Ok(()),
    };
    if !name.is_empty() {
        names.push(name);
    }
    Ok(())
}
