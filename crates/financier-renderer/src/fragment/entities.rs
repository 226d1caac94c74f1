//! HTML input normalization before XML parsing.
//!
//! Named HTML entities are not known to an XML reader, and HTML tolerates a
//! bare `&` in text. Both are rewritten so the fragment parser sees
//! well-formed references only. The content of `script`, `style` and
//! `textarea` is not markup and is escaped to read back as plain text.

use std::sync::LazyLock;

use regex::Regex;

/// Named entity reference, e.g. `&nbsp;`.
static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("invalid entity regex"));

/// Ampersand, optionally followed by a complete reference.
static AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#?[A-Za-z0-9]+;)?").expect("invalid ampersand regex"));

/// Opening tag of an element whose content is not markup.
static RAW_TEXT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(script|style|textarea)\b[^>]*>").expect("invalid raw text regex")
});

/// Escape the content of `script`, `style` and `textarea` elements.
///
/// Script and style content is taken literally. Textarea content keeps its
/// character references. An element without an end tag runs to the end of
/// the input.
pub(crate) fn escape_raw_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(caps) = RAW_TEXT_OPEN.captures(rest) {
        let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        out.push_str(&rest[..open.end()]);
        rest = &rest[open.end()..];
        if open.as_str().ends_with("/>") {
            continue;
        }

        let name = name.as_str().to_ascii_lowercase();
        let end = rest
            .to_ascii_lowercase()
            .find(&format!("</{name}"))
            .unwrap_or(rest.len());
        let content = &rest[..end];
        if name == "textarea" {
            out.push_str(&content.replace('<', "&lt;"));
        } else {
            out.push_str(&content.replace('&', "&amp;").replace('<', "&lt;"));
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Replace named HTML entities with their characters.
///
/// The XML entities (`amp`, `lt`, `gt`, `quot`, `apos`) and unknown names are
/// kept as written.
pub(crate) fn convert_named_entities(html: &str) -> String {
    NAMED_ENTITY
        .replace_all(html, |caps: &regex::Captures| {
            named_entity(&caps[1]).map_or_else(|| caps[0].to_owned(), str::to_owned)
        })
        .into_owned()
}

/// Escape every `&` that does not start a reference.
pub(crate) fn escape_stray_ampersands(html: &str) -> String {
    AMPERSAND
        .replace_all(html, |caps: &regex::Captures| match caps.get(1) {
            Some(_) => caps[0].to_owned(),
            None => "&amp;".to_owned(),
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{00a0}",
        "shy" => "\u{00ad}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "zwj" => "\u{200d}",
        "zwnj" => "\u{200c}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{00b7}",
        "prime" => "\u{2032}",
        "Prime" => "\u{2033}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",
        "sect" => "\u{00a7}",
        "para" => "\u{00b6}",
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{00b0}",
        "micro" => "\u{00b5}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "plusmn" => "\u{00b1}",
        "minus" => "\u{2212}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "asymp" => "\u{2248}",
        "infin" => "\u{221e}",
        "sum" => "\u{2211}",
        "prod" => "\u{220f}",
        "radic" => "\u{221a}",
        "frac12" => "\u{00bd}",
        "frac14" => "\u{00bc}",
        "frac34" => "\u{00be}",
        "sup2" => "\u{00b2}",
        "sup3" => "\u{00b3}",
        "larr" => "\u{2190}",
        "uarr" => "\u{2191}",
        "rarr" => "\u{2192}",
        "darr" => "\u{2193}",
        "harr" => "\u{2194}",
        "rArr" => "\u{21d2}",
        "hArr" => "\u{21d4}",
        "alpha" => "\u{03b1}",
        "beta" => "\u{03b2}",
        "gamma" => "\u{03b3}",
        "delta" => "\u{03b4}",
        "epsilon" => "\u{03b5}",
        "lambda" => "\u{03bb}",
        "mu" => "\u{03bc}",
        "pi" => "\u{03c0}",
        "sigma" => "\u{03c3}",
        "omega" => "\u{03c9}",
        "Delta" => "\u{0394}",
        "Sigma" => "\u{03a3}",
        "Omega" => "\u{03a9}",
        _ => return None,
    })
}
