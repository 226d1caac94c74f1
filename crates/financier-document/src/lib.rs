//! Financier document model.
//!
//! A document holds a name, a markdown body, custom CSS and a collection of
//! embedded image resources. It is stored as a single JSON file in which
//! each resource is a base64 data URL:
//!
//! ```json
//! {"name": "Report", "markdown": "![](3f2a...)", "css": "", "resources": {"3f2a...": "data:image/png;base64,..."}}
//! ```
//!
//! [`Resources`] implements [`ResourceResolver`](financier_renderer::ResourceResolver),
//! so image tokens in the markdown render as their data URLs.

mod document;
mod error;
mod resource;

pub use document::Document;
pub use error::DocumentError;
pub use resource::{Resource, Resources, image_reference, mime_for_path};
