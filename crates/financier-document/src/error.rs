//! Error types for document operations.

use std::path::PathBuf;

/// Error while loading, saving or editing a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document JSON is malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource is not a `data:<mime>;base64,<payload>` URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(&'static str),

    /// Resource payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// File type cannot be imported as a resource.
    #[error("unsupported resource type: {}", .0.display())]
    UnsupportedType(PathBuf),

    /// No resource with this identifier.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
}
