//! Event-processing state for the base markdown renderer.
//!
//! These structs track context between pulldown-cmark start and end events.

use pulldown_cmark::Alignment;

use crate::prefix::FenceInfo;

/// State for tracking code block rendering.
#[derive(Default)]
pub struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Parsed fence metadata of the current block.
    info: FenceInfo,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block.
    pub fn start(&mut self, info: FenceInfo) {
        self.active = true;
        self.info = info;
        self.buffer.clear();
    }

    /// End the current code block and return (info, content).
    pub fn end(&mut self) -> (FenceInfo, String) {
        self.active = false;
        (
            std::mem::take(&mut self.info),
            std::mem::take(&mut self.buffer),
        )
    }

    /// Check if we're inside a code block.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the code block buffer.
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    /// Start the table header row.
    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    /// End the table header row.
    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Start a new table row.
    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    /// Move to the next cell.
    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Check if we're in the table header.
    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub struct ImageState {
    /// Nesting depth; images may appear inside image alt text.
    depth: usize,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    /// Start capturing image alt text.
    pub fn start(&mut self) {
        if self.depth == 0 {
            self.alt_text.clear();
        }
        self.depth += 1;
    }

    /// End image capture. Returns the alt text once the outermost image closes.
    pub fn end(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.alt_text))
    }

    /// Check if we're inside an image.
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Append text to the alt text buffer.
    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// State for tracking heading content.
///
/// Heading markup is buffered so the `#id .class` prefix can be split off
/// before the opening tag is written.
#[derive(Default)]
pub struct HeadingState {
    level: Option<u8>,
    html: String,
}

impl HeadingState {
    /// Start buffering a heading.
    pub fn start(&mut self, level: u8) {
        self.level = Some(level);
        self.html.clear();
    }

    /// Finish the heading, returning its level and buffered inner HTML.
    pub fn end(&mut self) -> Option<(u8, String)> {
        let level = self.level.take()?;
        Some((level, std::mem::take(&mut self.html)))
    }

    /// Check if we're inside a heading.
    pub fn is_active(&self) -> bool {
        self.level.is_some()
    }

    /// Heading HTML buffer.
    pub fn buffer(&mut self) -> &mut String {
        &mut self.html
    }
}

/// State for tracking paragraph content.
///
/// Paragraphs are buffered because a leading `| caption` line turns them into
/// figure blocks.
#[derive(Default)]
pub struct ParagraphState {
    active: bool,
    html: String,
}

impl ParagraphState {
    /// Start buffering a paragraph.
    pub fn start(&mut self) {
        self.active = true;
        self.html.clear();
    }

    /// Finish the paragraph, returning its inner HTML.
    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.html)
    }

    /// Check if we're inside a paragraph.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Paragraph HTML buffer.
    pub fn buffer(&mut self) -> &mut String {
        &mut self.html
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape only `<`, as code blocks are emitted.
#[must_use]
pub fn escape_lt(s: &str) -> String {
    s.replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_escape_lt_only() {
        assert_eq!(escape_lt("a < b && c > d"), "a &lt; b && c > d");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(FenceInfo {
            language: Some("rust".to_owned()),
            ..FenceInfo::default()
        });
        assert!(state.is_active());

        state.push_str("fn main() {}");
        let (info, content) = state.end();
        assert_eq!(info.language.as_deref(), Some("rust"));
        assert_eq!(content, "fn main() {}");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::Center, Alignment::Right]);

        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:left""#
        );

        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:center""#
        );

        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_image_state_nested() {
        let mut state = ImageState::default();
        state.start();
        state.push_str("outer ");
        state.start();
        state.push_str("inner");
        assert_eq!(state.end(), None);
        assert!(state.is_active());
        assert_eq!(state.end().as_deref(), Some("outer inner"));
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_state() {
        let mut state = HeadingState::default();
        assert!(!state.is_active());
        state.start(2);
        state.buffer().push_str("Title");
        assert_eq!(state.end(), Some((2, "Title".to_owned())));
        assert_eq!(state.end(), None);
    }

    #[test]
    fn test_paragraph_state() {
        let mut state = ParagraphState::default();
        state.start();
        assert!(state.is_active());
        state.buffer().push_str("text");
        assert_eq!(state.end(), "text");
        assert!(!state.is_active());
    }
}
