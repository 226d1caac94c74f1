//! Base markdown renderer.
//!
//! Converts markdown to an HTML string with Financier's rendering rules:
//!
//! - fenced code blocks carry line-number metadata and `language-*` classes
//! - headings accept a `#id .class` prefix
//! - paragraphs starting with `| ` become captioned `figure` blocks
//! - image tokens are resolved through a [`ResourceResolver`]
//!
//! The output is raw: figures are not yet grouped or numbered. See
//! [`annotate`](crate::annotate) for the structural passes.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::prefix::{FenceInfo, Prefix, parse_caption, parse_fence_info, parse_heading};
use crate::resolver::{ResourceResolver, image_source};
use crate::state::{
    CodeBlockState, HeadingState, ImageState, ParagraphState, TableState, escape_html, escape_lt,
};
use crate::util::heading_level_to_num;

/// Attribute marking a caption figure as freshly created.
///
/// Lifted into [`FigureMark::Clean`](crate::fragment::FigureMark) when the
/// output is parsed into a fragment, so it never survives annotation.
pub(crate) const CLEAN_MARKER_ATTR: &str = "data-is-clean";

/// Markdown to HTML renderer.
///
/// # Example
///
/// ```
/// use financier_renderer::{MarkdownRenderer, NoResources};
///
/// let html = MarkdownRenderer::new(&NoResources).render("## #intro Hello");
/// assert_eq!(html, r#"<h2 id="intro">Hello</h2>"#);
/// ```
pub struct MarkdownRenderer<'r> {
    output: String,
    resolver: &'r dyn ResourceResolver,
    gfm: bool,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    paragraph: ParagraphState,
    pending_image: Option<(String, String)>,
}

impl<'r> MarkdownRenderer<'r> {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new(resolver: &'r dyn ResourceResolver) -> Self {
        Self {
            output: String::with_capacity(4096),
            resolver,
            gfm: true,
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            paragraph: ParagraphState::default(),
            pending_image: None,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Render markdown text to HTML.
    pub fn render(&mut self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        for event in parser {
            self.process_event(event);
        }
        std::mem::take(&mut self.output)
    }

    /// Buffer that currently receives output.
    fn sink(&mut self) -> &mut String {
        if self.heading.is_active() {
            self.heading.buffer()
        } else if self.paragraph.is_active() {
            self.paragraph.buffer()
        } else {
            &mut self.output
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => {
                if !self.image.is_active() {
                    self.sink().push_str(&html);
                }
            }
            Event::SoftBreak => {
                if self.image.is_active() {
                    self.image.push_str(" ");
                } else {
                    self.sink().push('\n');
                }
            }
            Event::HardBreak => self.sink().push_str("<br>\n"),
            Event::Rule => self.sink().push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                let marker = if checked {
                    r#"<input type="checkbox" checked disabled> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                };
                self.sink().push_str(marker);
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.paragraph.start(),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the prefix is known.
                self.heading.start(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.sink().push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(ref info) => parse_fence_info(info),
                    CodeBlockKind::Indented => FenceInfo::default(),
                };
                self.code.start(info);
            }
            Tag::List(start) => {
                let out = self.sink();
                match start {
                    Some(1) => out.push_str("<ol>"),
                    Some(n) => write!(out, r#"<ol start="{n}">"#).unwrap(),
                    None => out.push_str("<ul>"),
                }
            }
            Tag::Item => self.sink().push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.sink().push_str("<dl>"),
            Tag::DefinitionListTitle => self.sink().push_str("<dt>"),
            Tag::DefinitionListDefinition => self.sink().push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.sink().push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.sink().push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.sink().push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.sink(), "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.sink().push_str("<em>"),
            Tag::Strong => self.sink().push_str("<strong>"),
            Tag::Strikethrough => self.sink().push_str("<s>"),
            Tag::Superscript => self.sink().push_str("<sup>"),
            Tag::Subscript => self.sink().push_str("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    write!(link, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                link.push('>');
                self.sink().push_str(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the end tag; nested images only
                // contribute their text.
                if !self.image.is_active() {
                    self.pending_image = Some((dest_url.to_string(), title.to_string()));
                }
                self.image.start();
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.finish_paragraph(),
            TagEnd::Heading(_) => self.finish_heading(),
            TagEnd::BlockQuote(_) => self.sink().push_str("</blockquote>"),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(ordered) => self
                .sink()
                .push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.sink().push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.sink().push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.sink().push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.sink().push_str("</dd>"),
            TagEnd::Table => self.sink().push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.sink().push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.sink().push_str("</tr>"),
            TagEnd::TableCell => {
                let close = if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                };
                self.sink().push_str(close);
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.sink().push_str("</em>"),
            TagEnd::Strong => self.sink().push_str("</strong>"),
            TagEnd::Strikethrough => self.sink().push_str("</s>"),
            TagEnd::Superscript => self.sink().push_str("</sup>"),
            TagEnd::Subscript => self.sink().push_str("</sub>"),
            TagEnd::Link => self.sink().push_str("</a>"),
            TagEnd::Image => {
                if let Some(alt) = self.image.end()
                    && let Some((token, title)) = self.pending_image.take()
                {
                    let img = self.image_tag(&token, &title, &alt);
                    self.sink().push_str(&img);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            let escaped = escape_html(text);
            self.sink().push_str(&escaped);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        let html = format!(
            r#"<code class="wrap language-none">{}</code>"#,
            escape_html(code)
        );
        self.sink().push_str(&html);
    }

    fn image_tag(&self, token: &str, title: &str, alt: &str) -> String {
        let src = image_source(self.resolver, token);
        let mut img = format!(r#"<img src="{}""#, escape_html(&src));
        if !title.is_empty() {
            write!(img, r#" title="{}""#, escape_html(title)).unwrap();
        }
        write!(img, r#" alt="{}">"#, escape_html(alt)).unwrap();
        img
    }

    fn finish_heading(&mut self) {
        let Some((level, html)) = self.heading.end() else {
            return;
        };
        let heading = parse_heading(html.trim());
        let mut out = format!("<h{level}");
        push_prefix_attrs(&mut out, &heading.prefix);
        write!(out, ">{}</h{level}>", heading.text).unwrap();
        self.sink().push_str(&out);
    }

    fn finish_code_block(&mut self) {
        let (info, mut content) = self.code.end();
        if content.ends_with('\n') {
            content.pop();
        }

        let out = self.sink();
        out.push_str("<pre");
        if info.line_numbers {
            out.push_str(r#" class="wrappable-line-numbers""#);
        }
        if let Some(start) = info.start {
            write!(out, r#" data-start="{start}""#).unwrap();
        }
        write!(
            out,
            r#"><code class="wrap language-{}">{}</code></pre>"#,
            info.language.as_deref().unwrap_or("none"),
            escape_lt(&content)
        )
        .unwrap();
    }

    fn finish_paragraph(&mut self) {
        let html = self.paragraph.end();

        let Some(block) = parse_caption(&html) else {
            write!(self.sink(), "<p>{html}</p>").unwrap();
            return;
        };

        // The lines after the caption keep their rendered inline HTML, so
        // images and reference links resolve as anywhere else.
        let mut figure = format!("<figure {CLEAN_MARKER_ATTR}");
        push_prefix_attrs(&mut figure, &block.prefix);
        write!(figure, "><figcaption>{}</figcaption></figure>", block.caption).unwrap();
        if !block.rest.trim().is_empty() {
            write!(figure, "<p>{}</p>", block.rest.trim_end()).unwrap();
        }

        self.sink().push_str(&figure);
    }
}

/// Write `id` and `class` attributes for a parsed prefix.
fn push_prefix_attrs(out: &mut String, prefix: &Prefix<'_>) {
    if let Some(id) = prefix.id {
        write!(out, r#" id="{id}""#).unwrap();
    }
    if let Some(class) = prefix.class_attr() {
        write!(out, r#" class="{class}""#).unwrap();
    }
}
