//! Generated build-file fragments
//!
//! A [`Fragment`] is an MSBuild project holding an optional property block
//! and an ordered list of guarded imports. It is built in memory, rendered
//! once, and written once.

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};

const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";
const TOOLS_VERSION: &str = "14.0";

/// A property in the fragment's property group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// An import of another project, guarded by a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    project: String,
    condition: String,
}

impl Import {
    /// Import `project` only if it exists on disk.
    pub fn guarded(project: impl Into<String>) -> Self {
        let project = project.into();
        let condition = format!(" Exists('{project}') ");
        Self { project, condition }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }
}

/// An MSBuild project fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    properties: Vec<Property>,
    imports: Vec<Import>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.push(Property {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn add_import(&mut self, import: Import) {
        self.imports.push(import);
    }

    /// Append one guarded import per project, in order.
    pub fn add_guarded_imports<I, S>(&mut self, projects: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(projects.into_iter().map(Import::guarded));
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Serialize to MSBuild XML. The property group is omitted when empty.
    pub fn render(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(render_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("Project").with_attributes([
                ("ToolsVersion", TOOLS_VERSION),
                ("xmlns", MSBUILD_NAMESPACE),
            ])))
            .map_err(render_error)?;

        if !self.properties.is_empty() {
            writer
                .write_event(Event::Start(BytesStart::new("PropertyGroup")))
                .map_err(render_error)?;
            for property in &self.properties {
                let name = property.name.as_str();
                writer
                    .write_event(Event::Start(BytesStart::new(name)))
                    .map_err(render_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(&property.value)))
                    .map_err(render_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(render_error)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("PropertyGroup")))
                .map_err(render_error)?;
        }

        for import in &self.imports {
            let project = escape_attribute(&import.project);
            let condition = escape_attribute(&import.condition);
            let mut element = BytesStart::new("Import");
            element.push_attribute(Attribute::from((b"Project".as_slice(), project.as_bytes())));
            element.push_attribute(Attribute::from((
                b"Condition".as_slice(),
                condition.as_bytes(),
            )));
            writer
                .write_event(Event::Empty(element))
                .map_err(render_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("Project")))
            .map_err(render_error)?;

        let mut rendered = String::from_utf8(writer.into_inner()).map_err(render_error)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

fn render_error(e: impl std::fmt::Display) -> Error {
    Error::FragmentRender {
        message: e.to_string(),
    }
}

/// Escape an attribute value for a double-quoted attribute, leaving the
/// apostrophes of MSBuild conditions readable.
fn escape_attribute(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}
