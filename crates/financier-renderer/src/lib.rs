//! Markdown to numbered, cross-referenced HTML.
//!
//! Rendering happens in two stages:
//!
//! - [`MarkdownRenderer`] converts markdown to raw HTML with Financier's
//!   rendering rules (fence metadata, heading and caption prefixes, resolved
//!   image tokens).
//! - [`Annotator`] parses that HTML into a [`Fragment`] and groups figures,
//!   numbers headings and captions, and copies numbering onto `#id` links.
//!
//! [`MarkdownParser`] runs both.
//!
//! # Example
//!
//! ```
//! use financier_renderer::{MarkdownParser, NoResources};
//!
//! let html = MarkdownParser::new(&NoResources).parse("# Title\n\n| Listing\n\n```\nx\n```");
//! assert!(html.contains(r#"<figcaption data-code data-total="1" data-h1="1" data-h1-total="1">"#));
//! ```

pub mod annotate;
mod error;
pub mod fragment;
mod highlight;
mod parser;
mod prefix;
mod renderer;
mod resolver;
mod state;
mod util;

pub use annotate::Annotator;
pub use error::FragmentError;
pub use fragment::Fragment;
pub use highlight::{Highlighter, NoHighlight, SyntectHighlighter};
pub use parser::MarkdownParser;
pub use prefix::{FenceInfo, parse_fence_info};
pub use renderer::MarkdownRenderer;
pub use resolver::{NoResources, ResourceResolver};
pub use state::escape_html;
