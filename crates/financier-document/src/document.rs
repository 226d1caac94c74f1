//! The document and its single-file JSON format.

use std::fs;
use std::path::Path;

use financier_renderer::MarkdownParser;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::resource::Resources;

/// A Financier document.
///
/// Serialized as `{"name", "markdown", "css", "resources": {id: dataURL}}`.
/// Missing fields load as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name, used as the page title.
    #[serde(default)]
    pub name: String,

    /// Markdown body.
    #[serde(default)]
    pub markdown: String,

    /// Custom CSS applied to the rendered body.
    #[serde(default)]
    pub css: String,

    /// Embedded resources referenced from the markdown.
    #[serde(default)]
    pub resources: Resources,
}

impl Document {
    /// Create an empty document with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a document file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            resources = document.resources.len(),
            "Loaded document"
        );
        Ok(document)
    }

    /// Write the document to a file, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "Saved document");
        Ok(())
    }

    /// Append a markdown block, separated from existing text by a blank line.
    pub fn append_markdown(&mut self, block: &str) {
        let existing = self.markdown.trim_end_matches('\n');
        self.markdown = if existing.is_empty() {
            format!("{block}\n")
        } else {
            format!("{existing}\n\n{block}\n")
        };
    }

    /// Parser resolving image tokens against this document's resources.
    #[must_use]
    pub fn parser(&self) -> MarkdownParser<'_> {
        MarkdownParser::new(&self.resources)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::resource::{Resource, image_reference};

    #[test]
    fn test_default_is_empty() {
        let document = Document::default();
        assert_eq!(document.name, "");
        assert_eq!(document.markdown, "");
        assert_eq!(document.css, "");
        assert!(document.resources.is_empty());
    }

    #[test]
    fn test_json_format() {
        let mut document = Document::new("Report");
        document.markdown = "# Hi".to_owned();
        document.css = "h1 { color: red; }".to_owned();
        document
            .resources
            .insert("r1", Resource::from_bytes(b"hi".to_vec(), "image/png"));

        assert_eq!(
            document.to_json().unwrap(),
            r##"{"name":"Report","markdown":"# Hi","css":"h1 { color: red; }","resources":{"r1":"data:image/png;base64,aGk="}}"##
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let document = Document::from_json(r#"{"markdown":"text"}"#).unwrap();
        assert_eq!(document.name, "");
        assert_eq!(document.markdown, "text");
        assert!(document.resources.is_empty());
    }

    #[test]
    fn test_invalid_resource_rejected() {
        let result = Document::from_json(r#"{"resources":{"a":"not a data url"}}"#);
        assert!(matches!(result, Err(DocumentError::Json(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let mut document = Document::new("Saved");
        let id = document
            .resources
            .add(Resource::from_bytes(vec![1, 2, 3], "image/jpeg"));
        document.append_markdown(&image_reference(&id));
        document.save(&path).unwrap();

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded, document);
        assert_eq!(loaded.resources.get(&id).unwrap().bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Document::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }

    #[test]
    fn test_append_markdown() {
        let mut document = Document::default();
        document.append_markdown("![](a)");
        assert_eq!(document.markdown, "![](a)\n");
        document.append_markdown("![](b)");
        assert_eq!(document.markdown, "![](a)\n\n![](b)\n");
    }

    #[test]
    fn test_parser_resolves_resources() {
        let mut document = Document::new("Doc");
        document
            .resources
            .insert("pic", Resource::from_bytes(b"hi".to_vec(), "image/png"));
        document.markdown = "| Picture\n![](pic)".to_owned();

        let html = document.parser().parse(&document.markdown);
        assert_eq!(
            html,
            r#"<figure><img src="data:image/png;base64,aGk=" alt=""><figcaption data-image data-total="1">Picture</figcaption></figure>"#
        );
    }
}
