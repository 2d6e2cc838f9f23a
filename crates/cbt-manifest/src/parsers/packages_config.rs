//! `packages.config` parser

use cbt_fs::NormalizedPath;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::format::{ManifestFormat, ManifestParser, package_from_entry, read_manifest};
use crate::package::PackageIdentity;

const PACKAGE_ELEMENT: &[u8] = b"package";

/// Parser for flat `<packages><package id=".." version=".." /></packages>` manifests
#[derive(Debug, Default)]
pub struct PackagesConfigParser;

impl PackagesConfigParser {
    pub fn new() -> Self {
        Self
    }

    fn read_attribute(
        manifest: &NormalizedPath,
        element: &BytesStart<'_>,
        name: &str,
    ) -> Result<Option<String>> {
        let invalid = |message: String| {
            Error::parse(manifest.to_native(), ManifestFormat::PackagesConfig, message)
        };
        match element.try_get_attribute(name) {
            Ok(Some(attr)) => attr
                .unescape_value()
                .map(|value| Some(value.into_owned()))
                .map_err(|e| invalid(e.to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    fn read_package(
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
        element: &BytesStart<'_>,
    ) -> Result<Option<PackageIdentity>> {
        let id = Self::read_attribute(manifest, element, "id")?;
        let version = Self::read_attribute(manifest, element, "version")?;
        Ok(package_from_entry(
            packages_root,
            manifest,
            id.as_deref(),
            version.as_deref(),
        ))
    }

    /// Parse `packages.config` markup.
    pub fn parse_str(
        &self,
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
        source: &str,
    ) -> Result<Vec<PackageIdentity>> {
        let invalid = |message: String| {
            Error::parse(manifest.to_native(), ManifestFormat::PackagesConfig, message)
        };

        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut packages = Vec::new();
        let mut depth = 0usize;
        let mut seen_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) => {
                    depth += 1;
                    seen_root = true;
                    if element.local_name().as_ref() == PACKAGE_ELEMENT {
                        packages.extend(Self::read_package(packages_root, manifest, &element)?);
                    }
                }
                Ok(Event::Empty(element)) => {
                    seen_root = true;
                    if element.local_name().as_ref() == PACKAGE_ELEMENT {
                        packages.extend(Self::read_package(packages_root, manifest, &element)?);
                    }
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(invalid(format!(
                        "{} (at byte {})",
                        e,
                        reader.buffer_position()
                    )));
                }
            }
        }

        if !seen_root {
            return Err(invalid("document has no root element".to_string()));
        }
        if depth > 0 {
            return Err(invalid(format!(
                "unexpected end of document with {depth} unclosed element(s)"
            )));
        }

        tracing::debug!(%manifest, count = packages.len(), "Parsed packages.config");
        Ok(packages)
    }
}

impl ManifestParser for PackagesConfigParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::PackagesConfig
    }

    fn parse(
        &self,
        packages_root: &NormalizedPath,
        manifest: &NormalizedPath,
    ) -> Result<Vec<PackageIdentity>> {
        match read_manifest(self, manifest)? {
            Some(source) => self.parse_str(packages_root, manifest, &source),
            None => Ok(Vec::new()),
        }
    }
}
