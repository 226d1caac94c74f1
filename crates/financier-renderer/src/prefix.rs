//! Mini-languages embedded in markdown source.
//!
//! Three small grammars are recognized, all by regular expression:
//!
//! - fence info: `lang[line-numbers/5]`
//! - heading prefix: `#identifier .class .class Heading text`
//! - caption block: a paragraph whose first line is `| #identifier .class Caption`
//!
//! None of them ever fail: input that does not match degrades to the plain
//! rendering path.

use std::sync::LazyLock;

use regex::Regex;

/// Fence info pattern: optional language, optional `[line-numbers[/start]]`.
static FENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)?(?:\[(line-numbers)(?:/(-?[0-9]+))?\])?")
        .expect("invalid fence regex")
});

/// Heading prefix pattern: `#id .class ... text`.
///
/// Class tokens may be space separated (`.a .b`) or chained (`.a.b`).
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(#[A-Za-z0-9_-]+)?((?: *\.[A-Za-z0-9_-]+)*) +)?(.*)")
        .expect("invalid heading regex")
});

/// Caption block pattern: `| #id .class ... caption` followed by the block body.
static CAPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\| +(?:(#[A-Za-z0-9_-]+)?((?: *\.[A-Za-z0-9_-]+)*) +)?([^\n]+)\n?((?:.+\n?)*)")
        .expect("invalid caption regex")
});

/// Parsed code fence metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// Language token, if any.
    pub language: Option<String>,
    /// Whether `[line-numbers]` was requested.
    pub line_numbers: bool,
    /// First line number from `[line-numbers/N]`.
    pub start: Option<i64>,
}

/// Parse a fenced code block info string.
///
/// Only the first whitespace-separated token is considered.
#[must_use]
pub fn parse_fence_info(info: &str) -> FenceInfo {
    let token = info.split_whitespace().next().unwrap_or("");
    let Some(caps) = FENCE_PATTERN.captures(token) else {
        return FenceInfo::default();
    };

    FenceInfo {
        language: caps.get(1).map(|m| m.as_str().to_owned()),
        line_numbers: caps.get(2).is_some(),
        start: caps.get(3).and_then(|m| m.as_str().parse().ok()),
    }
}

/// Identifier and class list extracted from a heading or caption prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prefix<'a> {
    /// Identifier without the leading `#`.
    pub id: Option<&'a str>,
    /// Class names without the leading dots.
    pub classes: Vec<&'a str>,
}

impl Prefix<'_> {
    /// Classes joined with single spaces, or `None` when there are none.
    #[must_use]
    pub fn class_attr(&self) -> Option<String> {
        if self.classes.is_empty() {
            None
        } else {
            Some(self.classes.join(" "))
        }
    }
}

/// Heading text split into its prefix and the visible text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingText<'a> {
    pub prefix: Prefix<'a>,
    pub text: &'a str,
}

/// Split `#id .class text` heading content.
#[must_use]
pub fn parse_heading(content: &str) -> HeadingText<'_> {
    match HEADING_PATTERN.captures(content) {
        Some(caps) => HeadingText {
            prefix: prefix_from(caps.get(1), caps.get(2)),
            text: caps.get(3).map_or("", |m| m.as_str()),
        },
        None => HeadingText {
            prefix: Prefix::default(),
            text: content,
        },
    }
}

/// A paragraph recognized as a captioned figure block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionBlock<'a> {
    pub prefix: Prefix<'a>,
    /// Caption line, without the `| ` marker and prefix.
    pub caption: &'a str,
    /// Everything after the caption line.
    pub rest: &'a str,
}

/// Recognize `| #id .class caption\nbody` paragraphs.
#[must_use]
pub fn parse_caption(content: &str) -> Option<CaptionBlock<'_>> {
    let caps = CAPTION_PATTERN.captures(content)?;
    Some(CaptionBlock {
        prefix: prefix_from(caps.get(1), caps.get(2)),
        caption: caps.get(3)?.as_str(),
        rest: caps.get(4).map_or("", |m| m.as_str()),
    })
}

fn prefix_from<'a>(
    id: Option<regex::Match<'a>>,
    classes: Option<regex::Match<'a>>,
) -> Prefix<'a> {
    Prefix {
        id: id.map(|m| &m.as_str()[1..]),
        classes: classes
            .map(|m| {
                m.as_str()
                    .split(['.', ' '])
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    }
}
