//! Configuration documents
//!
//! A [`ConfigDocument`] is a mapping from section name to a flat-ish mapping
//! of key to value. It is what the platform reads from disk; a
//! [`ResolvedDocument`] is what the [`Resolver`](crate::Resolver) hands back
//! once every selected backend has been validated, defaulted and derived.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One configuration section: key to value.
pub type Section = Map<String, Value>;

/// Serialization formats a document can be read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Format::Toml),
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Format::Toml => "TOML",
            Format::Yaml => "YAML",
            Format::Json => "JSON",
        }
    }
}

/// A raw, unresolved configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: BTreeMap<String, Section>,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from text in the given format.
    ///
    /// Every top-level entry must be a table/mapping; anything else is a
    /// parse error.
    pub fn parse(content: &str, format: Format) -> Result<Self> {
        let parsed = match format {
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => {
                if content.trim().is_empty() {
                    Ok(Self::default())
                } else {
                    serde_yaml::from_str(content).map_err(|e| e.to_string())
                }
            }
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            format: format.label().into(),
            message,
        })
    }

    /// Load a document from a file, detecting the format from its extension.
    ///
    /// Files without an extension are read as YAML, which is how the
    /// platform's default `~/.lithops/config` is written.
    pub fn load(path: &Path) -> Result<Self> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Format::from_extension(ext)?,
            None => Format::Yaml,
        };
        tracing::debug!(?path, ?format, "Loading configuration document");
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content, format).map_err(|e| match e {
            Error::ConfigParse { format, message } => Error::ConfigParse {
                format,
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Serialize the document in the given format.
    ///
    /// TOML has no null, so `null` values are left out of TOML output.
    pub fn render(&self, format: Format) -> Result<String> {
        let rendered = match format {
            Format::Toml => {
                let sections: BTreeMap<&str, Section> = self
                    .sections
                    .iter()
                    .map(|(name, section)| (name.as_str(), without_nulls(section)))
                    .collect();
                toml::to_string_pretty(&sections).map_err(|e| e.to_string())
            }
            Format::Yaml => serde_yaml::to_string(&self.sections).map_err(|e| e.to_string()),
            Format::Json => {
                serde_json::to_string_pretty(&self.sections).map_err(|e| e.to_string())
            }
        };
        rendered.map_err(|message| Error::ConfigSerialize {
            format: format.label().into(),
            message,
        })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Get a section, inserting an empty one when absent.
    pub fn section_or_default(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Insert or replace a whole section.
    pub fn insert_section(&mut self, name: impl Into<String>, section: Section) {
        self.sections.insert(name.into(), section);
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove(name)
    }

    /// Read a single value.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Set a single value, creating the section when needed.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<Value>) {
        self.section_or_default(section)
            .insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, section: &str, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(section, key, value);
        self
    }

    /// Section names in sorted order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A document that went through the resolution pipeline.
///
/// There is no way to mutate it in place: the platform treats it as
/// immutable for the remainder of the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedDocument {
    document: ConfigDocument,
}

impl ResolvedDocument {
    pub(crate) fn new(document: ConfigDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    /// The generic platform section. Always present after resolution.
    pub fn generic(&self) -> Option<&Section> {
        self.document.section(crate::generic::GENERIC_SECTION)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.document.get(section, key)
    }

    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).and_then(Value::as_str)
    }

    pub fn render(&self, format: Format) -> Result<String> {
        self.document.render(format)
    }

    /// Give the underlying document back, e.g. to resolve it again.
    pub fn into_document(self) -> ConfigDocument {
        self.document
    }
}

fn without_nulls(section: &Section) -> Section {
    section
        .iter()
        .filter_map(|(key, value)| drop_null(value).map(|v| (key.clone(), v)))
        .collect()
}

fn drop_null(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(items.iter().filter_map(drop_null).collect())),
        Value::Object(map) => Some(Value::Object(without_nulls(map))),
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_toml_sections() {
        let doc = ConfigDocument::parse(
            r#"
[lithops]
storage = "minio"
workers = 8

[minio]
endpoint = "http://10.0.0.1:9000"
"#,
            Format::Toml,
        )
        .unwrap();

        assert_eq!(doc.get("lithops", "storage"), Some(&json!("minio")));
        assert_eq!(doc.get("lithops", "workers"), Some(&json!(8)));
        assert!(doc.contains_section("minio"));
    }

    #[test]
    fn parse_rejects_scalar_top_level_entries() {
        let err = ConfigDocument::parse("backend = \"aws_lambda\"\n", Format::Toml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "got: {err:?}");
    }

    #[test]
    fn empty_yaml_is_an_empty_document() {
        let doc = ConfigDocument::parse("  \n", Format::Yaml).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_extension("YML").unwrap(), Format::Yaml);
        assert_eq!(Format::from_extension("toml").unwrap(), Format::Toml);
        assert!(matches!(
            Format::from_extension("ini"),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn toml_output_leaves_out_nulls() {
        let doc = ConfigDocument::parse(
            "aws_s3:\n  region: us-east-1\n  session_token: ~\n  tags: [a, ~]\n",
            Format::Yaml,
        )
        .unwrap();

        let rendered = doc.render(Format::Toml).unwrap();
        let reparsed = ConfigDocument::parse(&rendered, Format::Toml).unwrap();
        assert_eq!(reparsed.get("aws_s3", "region"), Some(&json!("us-east-1")));
        assert_eq!(reparsed.get("aws_s3", "session_token"), None);
        assert_eq!(reparsed.get("aws_s3", "tags"), Some(&json!(["a"])));

        // Other formats keep them
        let json = doc.render(Format::Json).unwrap();
        assert!(json.contains("\"session_token\": null"));
    }

    #[test]
    fn with_builds_sections() {
        let doc = ConfigDocument::new()
            .with("aws", "region", "us-east-1")
            .with("aws_s3", "storage_bucket", "my-bucket");
        let names: Vec<_> = doc.section_names().collect();
        assert_eq!(names, vec!["aws", "aws_s3"]);
    }
}
