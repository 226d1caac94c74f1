//! Syntax highlighting for code figures.
//!
//! Highlighters produce the inner markup of a `code` element. The structure
//! annotator parses that markup and swaps it in for the plain code text.
//!
//! # Example
//!
//! ```
//! use financier_renderer::{Highlighter, NoHighlight};
//!
//! assert_eq!(NoHighlight.highlight("rust", "fn main() {}"), None);
//! ```

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Turns source code into highlighted inner HTML for a `code` element.
pub trait Highlighter {
    /// Highlight `code` written in `language`.
    ///
    /// Returns `None` when the language is unknown, leaving the code as is.
    fn highlight(&self, language: &str, code: &str) -> Option<String>;
}

/// Highlighter that never highlights.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight(&self, _language: &str, _code: &str) -> Option<String> {
        None
    }
}

/// Class-based highlighting with syntect's bundled syntax definitions.
///
/// Tokens are wrapped in `<span class="...">` elements using space-separated
/// scope names, so any syntect theme exported as CSS styles them.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
}

impl SyntectHighlighter {
    /// Create a highlighter with the default syntax set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, code: &str) -> Option<String> {
        let syntax = self.syntax_set.find_syntax_by_token(language)?;
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!(language, error = %err, "Syntax highlighting failed");
                return None;
            }
        }
        Some(generator.finalize())
    }
}

impl<T: Highlighter + ?Sized> Highlighter for &T {
    fn highlight(&self, language: &str, code: &str) -> Option<String> {
        (**self).highlight(language, code)
    }
}
