//! Binary resources embedded in a document.
//!
//! Resources are stored under generated identifiers and referenced from
//! markdown as image tokens (`![](id)`). On disk each resource is a data URL.

use std::collections::BTreeMap;
use std::path::Path;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use financier_renderer::ResourceResolver;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocumentError;

/// An embedded binary resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    mime: String,
    bytes: Vec<u8>,
}

impl Resource {
    /// Create a resource from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(data_url: &str) -> Result<Self, DocumentError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or(DocumentError::InvalidDataUrl("missing data: scheme"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(DocumentError::InvalidDataUrl("missing comma"))?;
        let mime = header.split(';').next().unwrap_or_default();
        let bytes = BASE64_STANDARD.decode(payload.trim())?;
        Ok(Self::from_bytes(bytes, mime))
    }

    /// Encode as a base64 data URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64_STANDARD.encode(&self.bytes))
    }

    /// Source usable as an image `src`.
    #[must_use]
    pub fn renderable_source(&self) -> String {
        self.to_data_url()
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Resources keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Resources {
    entries: BTreeMap<String, Resource>,
}

impl Resources {
    /// Add a resource under a new random identifier and return it.
    pub fn add(&mut self, resource: Resource) -> String {
        let id = Uuid::new_v4().to_string();
        self.entries.insert(id.clone(), resource);
        id
    }

    /// Store a resource under an explicit identifier, replacing any previous one.
    pub fn insert(&mut self, id: impl Into<String>, resource: Resource) {
        self.entries.insert(id.into(), resource);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.entries.get(id)
    }

    /// Remove a resource. Returns `false` if it did not exist.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over `(id, resource)` pairs ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.entries.iter().map(|(id, resource)| (id.as_str(), resource))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceResolver for Resources {
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).map(Resource::renderable_source)
    }
}

impl TryFrom<BTreeMap<String, String>> for Resources {
    type Error = DocumentError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut resources = Self::default();
        for (id, data_url) in map {
            resources.insert(id, Resource::from_data_url(&data_url)?);
        }
        Ok(resources)
    }
}

impl From<Resources> for BTreeMap<String, String> {
    fn from(resources: Resources) -> Self {
        resources
            .entries
            .into_iter()
            .map(|(id, resource)| (id, resource.to_data_url()))
            .collect()
    }
}

/// MIME type of an importable file, by extension.
///
/// Only PNG and JPEG images are supported.
pub fn mime_for_path(path: &Path) -> Result<&'static str, DocumentError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        _ => Err(DocumentError::UnsupportedType(path.to_path_buf())),
    }
}

/// Markdown snippet that displays resource `id`.
#[must_use]
pub fn image_reference(id: &str) -> String {
    format!("![]({id})")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_data_url_roundtrip() {
        let resource = Resource::from_bytes(vec![0x89, b'P', b'N', b'G'], "image/png");
        let data_url = resource.to_data_url();
        assert_eq!(data_url, "data:image/png;base64,iVBORw==");
        assert_eq!(Resource::from_data_url(&data_url).unwrap(), resource);
    }

    #[test]
    fn test_invalid_data_urls() {
        assert!(matches!(
            Resource::from_data_url("image/png;base64,AAAA"),
            Err(DocumentError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            Resource::from_data_url("data:image/png;base64"),
            Err(DocumentError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            Resource::from_data_url("data:image/png;base64,***"),
            Err(DocumentError::Base64(_))
        ));
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let mut resources = Resources::default();
        let a = resources.add(Resource::from_bytes(vec![1], "image/png"));
        let b = resources.add(Resource::from_bytes(vec![2], "image/png"));
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
        assert_eq!(resources.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut resources = Resources::default();
        let id = resources.add(Resource::from_bytes(vec![1], "image/png"));
        assert!(resources.remove(&id));
        assert!(!resources.remove(&id));

        resources.insert("x", Resource::from_bytes(vec![1], "image/png"));
        resources.clear();
        assert!(resources.is_empty());
    }

    #[test]
    fn test_resolver_returns_data_url() {
        let mut resources = Resources::default();
        resources.insert("logo", Resource::from_bytes(b"hi".to_vec(), "image/jpeg"));
        assert_eq!(
            resources.resolve("logo").as_deref(),
            Some("data:image/jpeg;base64,aGk=")
        );
        assert_eq!(resources.resolve("missing"), None);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.png")).unwrap(), "image/png");
        assert_eq!(mime_for_path(Path::new("b.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("c.jpeg")).unwrap(), "image/jpeg");
        assert!(matches!(
            mime_for_path(Path::new("d.gif")),
            Err(DocumentError::UnsupportedType(path)) if path == PathBuf::from("d.gif")
        ));
        assert!(mime_for_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_image_reference() {
        assert_eq!(image_reference("abc"), "![](abc)");
    }
}
