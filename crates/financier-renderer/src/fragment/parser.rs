//! HTML fragment parser on top of the quick-xml event reader.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::entities::{convert_named_entities, escape_raw_text, escape_stray_ampersands};
use super::{Element, FigureMark, Fragment, NodeData, NodeId};
use crate::error::FragmentError;
use crate::renderer::CLEAN_MARKER_ATTR;

/// Elements that never have children or end tags.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

impl Fragment {
    /// Parse an HTML fragment.
    ///
    /// Accepts the HTML produced by the base renderer plus the usual HTML
    /// looseness: unclosed void elements, valueless attributes, named
    /// entities, bare ampersands, stray end tags and unescaped `script`,
    /// `style` and `textarea` content.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be tokenized.
    pub fn parse(html: &str) -> Result<Self, FragmentError> {
        let html = escape_stray_ampersands(&convert_named_entities(&escape_raw_text(html)));

        let mut reader = Reader::from_str(&html);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut fragment = Fragment::new();
        let mut open = vec![fragment.root()];

        loop {
            let current = *open.last().unwrap_or(&fragment.root());
            match reader.read_event()? {
                Event::Start(e) => {
                    let element = decode_element(&reader, &e)?;
                    let void = is_void(&element.name);
                    let id = fragment.push_node(NodeData::Element(element));
                    fragment.append(current, id);
                    if !void {
                        open.push(id);
                    }
                }
                Event::Empty(e) => {
                    let element = decode_element(&reader, &e)?;
                    let id = fragment.push_node(NodeData::Element(element));
                    fragment.append(current, id);
                }
                Event::End(e) => {
                    let name = decode_name(&reader, e.name().as_ref());
                    // Close up to the nearest matching open element; stray
                    // end tags are dropped.
                    if let Some(depth) = open
                        .iter()
                        .skip(1)
                        .rposition(|&id| fragment.is_element(id, &name))
                    {
                        open.truncate(depth + 1);
                    }
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    fragment.append_text(current, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    fragment.append_text(current, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    fragment.append_text(current, &String::from_utf8_lossy(&e));
                }
                Event::Comment(e) => {
                    let comment = reader.decoder().decode(&e)?.into_owned();
                    let id = fragment.push_node(NodeData::Comment(comment));
                    fragment.append(current, id);
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        Ok(fragment)
    }

    /// Append text to `parent`, merging with a trailing text node.
    fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.children(parent).last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0].data
        {
            existing.push_str(text);
            return;
        }
        let id = self.create_text(text);
        self.append(parent, id);
    }
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader
        .decoder()
        .decode(name)
        .map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
        .to_ascii_lowercase()
}

fn decode_element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Element, FragmentError> {
    let mut element = Element::new(decode_name(reader, e.name().as_ref()));
    for attr in e.html_attributes() {
        let attr = attr?;
        let key = decode_name(reader, attr.key.as_ref());
        if key == CLEAN_MARKER_ATTR {
            element.mark = Some(FigureMark::Clean);
            continue;
        }
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        if !element.attrs.contains(&key) {
            element.attrs.set(key, value);
        }
    }
    Ok(element)
}

/// Decode an entity reference name to its text.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = match s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => s[1..].parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}
