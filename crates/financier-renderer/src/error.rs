//! Error types for the fragment tree.

use std::str::Utf8Error;

/// Error while parsing rendered HTML into a [`Fragment`](crate::Fragment).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FragmentError {
    /// Markup could not be tokenized.
    #[error("HTML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Malformed attribute.
    #[error("HTML attribute error")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding names or text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}
