//! Render entry point: base rendering followed by structure annotation.

use tracing::warn;

use crate::annotate::Annotator;
use crate::fragment::Fragment;
use crate::highlight::{Highlighter, NoHighlight};
use crate::renderer::{CLEAN_MARKER_ATTR, MarkdownRenderer};
use crate::resolver::ResourceResolver;

/// Markdown to numbered, cross-referenced HTML.
///
/// # Example
///
/// ```
/// use financier_renderer::{MarkdownParser, NoResources};
///
/// let html = MarkdownParser::new(&NoResources).parse("# Intro\n\nSee [above](#x).");
/// assert_eq!(
///     html,
///     r##"<h1 data-header data-h1="1">Intro</h1><p>See <a href="#x">above</a>.</p>"##
/// );
/// ```
pub struct MarkdownParser<'a> {
    resolver: &'a dyn ResourceResolver,
    highlighter: &'a dyn Highlighter,
    gfm: bool,
}

impl<'a> MarkdownParser<'a> {
    /// Create a parser resolving images through `resolver`.
    ///
    /// GFM is enabled and highlighting is disabled by default.
    #[must_use]
    pub fn new(resolver: &'a dyn ResourceResolver) -> Self {
        Self {
            resolver,
            highlighter: &NoHighlight,
            gfm: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Highlight code figures with `highlighter`.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: &'a dyn Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Base rendering only, without figures or numbering.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        MarkdownRenderer::new(self.resolver)
            .with_gfm(self.gfm)
            .render(markdown)
    }

    /// Render and annotate `markdown`.
    ///
    /// If the rendered HTML cannot be parsed into a fragment tree, the
    /// un-annotated HTML is returned instead.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> String {
        let html = self.render(markdown);
        match Fragment::parse(&html) {
            Ok(mut fragment) => {
                Annotator::new(self.highlighter).annotate(&mut fragment);
                fragment.to_html()
            }
            Err(err) => {
                warn!(error = %err, "Could not parse rendered HTML, skipping annotation");
                html.replace(&format!("<figure {CLEAN_MARKER_ATTR}"), "<figure")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::resolver::NoResources;

    fn parse(markdown: &str) -> String {
        MarkdownParser::new(&NoResources).parse(markdown)
    }

    #[test]
    fn test_plain_paragraphs_have_no_numbering() {
        let html = parse("First paragraph.\n\nSecond *one*.");
        assert_eq!(html, "<p>First paragraph.</p><p>Second <em>one</em>.</p>");
        assert!(!html.contains("data-"));
    }

    #[test]
    fn test_heading_sequence_numbering() {
        let html = parse("# A\n\n## B\n\n## C\n\n# D\n\n## E");
        assert_eq!(
            html,
            concat!(
                r#"<h1 data-header data-h1="1">A</h1>"#,
                r#"<h2 data-header data-h1="1" data-h2="1">B</h2>"#,
                r#"<h2 data-header data-h1="1" data-h2="2">C</h2>"#,
                r#"<h1 data-header data-h1="2">D</h1>"#,
                r#"<h2 data-header data-h1="2" data-h2="1">E</h2>"#,
            )
        );
    }

    #[test]
    fn test_skipped_heading_level_fills_zero() {
        let html = parse("# A\n\n### Deep");
        assert!(html.contains(r#"<h3 data-header data-h1="1" data-h2="0" data-h3="1">Deep</h3>"#));
    }

    #[test]
    fn test_code_fence_with_line_numbers() {
        let html = parse("```js[line-numbers/3]\nx=1\n```");
        assert_eq!(
            html,
            r#"<figure><pre class="wrappable-line-numbers" data-start="3"><code class="wrap language-js">x=1</code></pre></figure>"#
        );
    }

    #[test]
    fn test_heading_prefix_and_anchor() {
        let html = parse("# Top\n\n## #intro .lead My Title\n\nSee [intro](#intro).");
        assert_eq!(
            html,
            concat!(
                r#"<h1 data-header data-h1="1">Top</h1>"#,
                r#"<h2 id="intro" class="lead" data-header data-h1="1" data-h2="1">My Title</h2>"#,
                r##"<p>See <a href="#intro" data-header data-h1="1" data-h2="1">intro</a>.</p>"##,
            )
        );
    }

    #[test]
    fn test_consecutive_fences_separate_figures() {
        let html = parse("```\na\n```\n\n```\nb\n```");
        assert_eq!(
            html,
            concat!(
                r#"<figure><pre><code class="wrap language-none">a</code></pre></figure>"#,
                r#"<figure><pre><code class="wrap language-none">b</code></pre></figure>"#,
            )
        );
    }

    #[test]
    fn test_captioned_code_listing() {
        let html = parse("# One\n\n| #hello Hello world\n\n```rust\nfn main() {}\n```\n\nSee [listing](#hello).");
        assert_eq!(
            html,
            concat!(
                r#"<h1 data-header data-h1="1">One</h1>"#,
                r#"<figure id="hello"><figcaption data-code data-total="1" data-h1="1" data-h1-total="1">Hello world</figcaption>"#,
                r#"<pre><code class="wrap language-rust">fn main() {}</code></pre></figure>"#,
                r##"<p>See <a href="#hello" data-code data-total="1" data-h1="1" data-h1-total="1">listing</a>.</p>"##,
            )
        );
    }

    #[test]
    fn test_captioned_table() {
        let html = parse("| .wide Results\n\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            html,
            concat!(
                r#"<figure class="wide"><figcaption data-table data-total="1">Results</figcaption>"#,
                r#"<table><thead><tr><th>a</th><th>b</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table></figure>"#,
            )
        );
    }

    #[test]
    fn test_captioned_image_block() {
        let resources = HashMap::from([("abc".to_owned(), "data:image/png;base64,AA==".to_owned())]);
        let html = MarkdownParser::new(&resources).parse("| #logo The logo\n![Logo](abc)");
        assert_eq!(
            html,
            concat!(
                r#"<figure id="logo"><img src="data:image/png;base64,AA==" alt="Logo">"#,
                r#"<figcaption data-image data-total="1">The logo</figcaption></figure>"#,
            )
        );
    }

    #[test]
    fn test_image_captions_restart_per_section() {
        let markdown = "# A\n\n## B\n\n| One\n![](1.png)\n\n| Two\n![](2.png)\n\n## C\n\n| Three\n![](3.png)";
        let html = parse(markdown);
        assert!(html.contains(
            r#"<figcaption data-image data-total="1" data-h1="1" data-h1-total="1" data-h2="1" data-h2-total="1">One</figcaption>"#
        ));
        assert!(html.contains(
            r#"<figcaption data-image data-total="2" data-h1="1" data-h1-total="2" data-h2="1" data-h2-total="2">Two</figcaption>"#
        ));
        assert!(html.contains(
            r#"<figcaption data-image data-total="3" data-h1="1" data-h1-total="3" data-h2="2" data-h2-total="1">Three</figcaption>"#
        ));
    }

    #[test]
    fn test_caption_kinds_counted_separately() {
        let html = parse("| Code\n\n```\nx\n```\n\n| Table\n\n| a |\n|---|\n| 1 |\n\n| Code 2\n\n```\ny\n```");
        assert!(html.contains(r#"<figcaption data-code data-total="1">Code</figcaption>"#));
        assert!(html.contains(r#"<figcaption data-table data-total="1">Table</figcaption>"#));
        assert!(html.contains(r#"<figcaption data-code data-total="2">Code 2</figcaption>"#));
    }

    #[test]
    fn test_markers_never_serialized() {
        let html = parse("| Lonely caption\n\n| Used\n\n```\nx\n```");
        assert!(!html.contains("data-is-clean"));
        assert!(!html.contains("data-is-code"));
    }

    #[test]
    fn test_dangling_anchor_untouched() {
        let html = parse("[nowhere](#missing)");
        assert_eq!(html, r##"<p><a href="#missing">nowhere</a></p>"##);
    }

    #[test]
    fn test_uncaptioned_figure_not_numbered() {
        let html = parse("![](a.png)");
        assert_eq!(html, r#"<figure><img src="a.png" alt=""></figure>"#);
    }

    #[test]
    fn test_render_skips_annotation() {
        let parser = MarkdownParser::new(&NoResources);
        assert_eq!(
            parser.render("| Cap"),
            r#"<figure data-is-clean><figcaption>Cap</figcaption></figure>"#
        );
    }

    #[test]
    fn test_renders_are_independent() {
        let parser = MarkdownParser::new(&NoResources);
        let first = parser.parse("# A\n\n| C\n\n```\nx\n```");
        let second = parser.parse("# A\n\n| C\n\n```\nx\n```");
        assert_eq!(first, second);
    }

    #[test]
    fn test_highlighter_used() {
        struct Marker;
        impl Highlighter for Marker {
            fn highlight(&self, language: &str, code: &str) -> Option<String> {
                Some(format!(r#"<span class="{language}">{code}</span>"#))
            }
        }
        let html = MarkdownParser::new(&NoResources)
            .with_highlighter(&Marker)
            .parse("```py\npass\n```");
        assert_eq!(
            html,
            r#"<figure><pre><code class="wrap language-py"><span class="py">pass</span></code></pre></figure>"#
        );
    }

    #[test]
    fn test_stray_inline_end_tag_keeps_annotation() {
        let html = parse("# A\n\ntext </span> more\n\n## B\n\n| Cap\n\n```\nx\n```");
        assert!(html.contains(r#"<h1 data-header data-h1="1">A</h1>"#));
        assert!(html.contains(r#"<h2 data-header data-h1="1" data-h2="1">B</h2>"#));
        assert!(html.contains(concat!(
            r#"<figure><figcaption data-code data-total="1" data-h1="1" data-h1-total="1" data-h2="1" data-h2-total="1">Cap</figcaption>"#,
            r#"<pre><code class="wrap language-none">x</code></pre></figure>"#,
        )));
    }

    #[test]
    fn test_script_block_kept_opaque() {
        let html = parse("<script>\nif (a < b) {}\n</script>\n\n| C\n\n```\nx\n```");
        assert!(html.starts_with("<script>\nif (a < b) {}\n</script>"));
        assert!(html.contains(r#"<figure><figcaption data-code data-total="1">C</figcaption><pre>"#));
        assert!(!html.contains("</>"));
    }

    #[test]
    fn test_caption_with_reference_image() {
        let resources = HashMap::from([("abc".to_owned(), "data:x".to_owned())]);
        let html = MarkdownParser::new(&resources).parse("| Logo\n![x][logo]\n\n[logo]: abc");
        assert_eq!(
            html,
            r#"<figure><img src="data:x" alt="x"><figcaption data-image data-total="1">Logo</figcaption></figure>"#
        );
    }

    #[test]
    fn test_unparseable_html_degrades() {
        let html = parse("| Cap\n\n<div <<<");
        assert!(html.contains("<figure><figcaption>Cap</figcaption></figure>"));
    }
}
