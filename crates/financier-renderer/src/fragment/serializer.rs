//! HTML5 serialization of a fragment tree.

use std::fmt::Write;

use super::parser::is_void;
use super::{Element, Fragment, NodeData, NodeId};

/// Attributes written without a value when empty: HTML boolean attributes
/// and the numbering markers.
const BARE_ATTRIBUTES: &[&str] = &[
    "checked",
    "disabled",
    "hidden",
    "open",
    "readonly",
    "required",
    "selected",
    "data-header",
    "data-code",
    "data-table",
    "data-image",
];

/// Elements whose text is written as is.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

impl Fragment {
    /// Serialize the children of the root to HTML.
    ///
    /// Figure marks are never written.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        for &child in self.children(self.root()) {
            self.serialize_node(child, &mut out);
        }
        out
    }

    /// Serialize the children of `id` to HTML.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.serialize_node(child, &mut out);
        }
        out
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Root => {
                for &child in self.children(id) {
                    self.serialize_node(child, out);
                }
            }
            NodeData::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|parent| self.tag_name(parent))
                    .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeData::Comment(comment) => write!(out, "<!--{comment}-->").unwrap(),
            NodeData::Element(element) => {
                write_start_tag(element, out);
                if is_void(&element.name) {
                    return;
                }
                for &child in self.children(id) {
                    self.serialize_node(child, out);
                }
                write!(out, "</{}>", element.name).unwrap();
            }
        }
    }
}

fn write_start_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in element.attrs.iter() {
        if value.is_empty() && BARE_ATTRIBUTES.contains(&key) {
            write!(out, " {key}").unwrap();
        } else {
            write!(out, r#" {key}="{}""#, escape_attr(value)).unwrap();
        }
    }
    out.push('>');
}

fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fragment::FigureMark;

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let tree = Fragment::parse(r#"<p>a<br/>b<img src="x.png"></p>"#).unwrap();
        assert_eq!(tree.to_html(), r#"<p>a<br>b<img src="x.png"></p>"#);
    }

    #[test]
    fn test_empty_attribute_written_bare() {
        let mut tree = Fragment::new();
        let h1 = tree.create_element("h1");
        tree.element_mut(h1).unwrap().attrs.set("data-header", "");
        tree.element_mut(h1).unwrap().attrs.set("data-h1", "1");
        tree.append(tree.root(), h1);
        assert_eq!(tree.to_html(), r#"<h1 data-header data-h1="1"></h1>"#);
    }

    #[test]
    fn test_other_empty_attributes_keep_value() {
        let tree = Fragment::parse(
            r#"<p><img src="a.png" alt=""><input type="checkbox" checked disabled></p>"#,
        )
        .unwrap();
        assert_eq!(
            tree.to_html(),
            r#"<p><img src="a.png" alt=""><input type="checkbox" checked disabled></p>"#
        );
    }

    #[test]
    fn test_script_and_style_text_unescaped() {
        let tree =
            Fragment::parse("<script>if (a < b && c) {}</script><style>p > a {}</style>").unwrap();
        assert_eq!(
            tree.to_html(),
            "<script>if (a < b && c) {}</script><style>p > a {}</style>"
        );
    }

    #[test]
    fn test_text_and_attribute_escaping() {
        let mut tree = Fragment::new();
        let a = tree.create_element("a");
        tree.element_mut(a).unwrap().attrs.set("title", r#"a & "b" <c>"#);
        let text = tree.create_text("x < y & z > w \"q\"");
        tree.append(a, text);
        tree.append(tree.root(), a);
        assert_eq!(
            tree.to_html(),
            r#"<a title="a &amp; &quot;b&quot; <c>">x &lt; y &amp; z &gt; w "q"</a>"#
        );
    }

    #[test]
    fn test_marks_not_serialized() {
        let mut tree = Fragment::new();
        let figure = tree.create_element("figure");
        tree.element_mut(figure).unwrap().mark = Some(FigureMark::Code);
        tree.append(tree.root(), figure);
        assert_eq!(tree.to_html(), "<figure></figure>");
    }

    #[test]
    fn test_inner_html() {
        let tree = Fragment::parse("<div><em>a</em>b</div>").unwrap();
        let div = tree.first_descendant_named(tree.root(), "div").unwrap();
        assert_eq!(tree.inner_html(div), "<em>a</em>b");
    }
}
