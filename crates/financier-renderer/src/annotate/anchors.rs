//! Numbering propagation to same-document links.

use crate::fragment::{Fragment, NodeId};

/// Copy the numbering attributes of each `#id` link target onto the link.
///
/// Links to a figure read from its figcaption. Dangling references are
/// skipped. Returns the number of links updated.
pub(crate) fn propagate_anchors(fragment: &mut Fragment) -> usize {
    let anchors = fragment.descendants_named(fragment.root(), "a");
    let mut updated = 0;

    for anchor in anchors {
        let Some(target) = fragment
            .element(anchor)
            .and_then(|e| e.attrs.get("href"))
            .and_then(|href| href.strip_prefix('#'))
            .filter(|id| !id.is_empty())
            .and_then(|id| resolve_target(fragment, id))
        else {
            continue;
        };

        let data: Vec<(String, String)> = fragment
            .element(target)
            .map(|e| {
                e.attrs
                    .iter()
                    .filter(|(key, _)| key.starts_with("data-"))
                    .map(|(key, value)| (key.to_owned(), value.to_owned()))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(element) = fragment.element_mut(anchor) {
            for (key, value) in data {
                element.attrs.set(key, value);
            }
            updated += 1;
        }
    }

    updated
}

fn resolve_target(fragment: &Fragment, id: &str) -> Option<NodeId> {
    let target = fragment.find_by_id(id)?;
    if fragment.is_element(target, "figure") {
        fragment.first_descendant_named(target, "figcaption")
    } else {
        Some(target)
    }
}
