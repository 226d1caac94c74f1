//! Figure grouping.
//!
//! Code blocks, top-level tables and top-level image paragraphs are moved into
//! `figure` containers. A block joins the figure right before it only when
//! that figure is still [`FigureMark::Clean`], i.e. a caption block that no
//! other block has claimed yet. Otherwise a new, uncaptioned figure is
//! created in its place.

use tracing::warn;

use crate::fragment::{FigureMark, Fragment, NodeId};
use crate::highlight::Highlighter;

/// Counts of blocks filed into figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupingStats {
    pub code: usize,
    pub tables: usize,
    pub images: usize,
}

/// Group code blocks, tables and image paragraphs into figures.
pub(crate) fn group_figures(fragment: &mut Fragment, highlighter: &dyn Highlighter) -> GroupingStats {
    let mut stats = GroupingStats::default();

    for pre in fragment.descendants_named(fragment.root(), "pre") {
        let figure = attaching_figure(fragment, pre, Some(FigureMark::Code));
        fragment.append(figure, pre);
        highlight_code_block(fragment, pre, highlighter);
        stats.code += 1;
    }
    clear_marks(fragment, FigureMark::Code);

    let root = fragment.root();
    let tables: Vec<NodeId> = fragment
        .element_children(root)
        .filter(|&id| fragment.is_element(id, "table"))
        .collect();
    for table in tables {
        let figure = attaching_figure(fragment, table, None);
        fragment.append(figure, table);
        stats.tables += 1;
    }

    let paragraphs: Vec<NodeId> = fragment
        .element_children(root)
        .filter(|&id| is_image_paragraph(fragment, id))
        .collect();
    for paragraph in paragraphs {
        let figure = attaching_figure(fragment, paragraph, None);
        let caption = fragment
            .element_children(figure)
            .find(|&id| fragment.is_element(id, "figcaption"));
        for img in fragment.descendants_named(paragraph, "img") {
            match caption {
                Some(caption) => fragment.insert_before(caption, img),
                None => fragment.append(figure, img),
            }
            stats.images += 1;
        }
        fragment.detach(paragraph);
    }

    stats
}

/// Find or create the figure that `block` is filed into.
///
/// A clean figure directly before `block` is claimed and given `claimed_mark`.
/// Any other predecessor gets a fresh figure inserted before `block`; in
/// particular a figure already holding a code block ([`FigureMark::Code`]) is
/// never reused.
fn attaching_figure(
    fragment: &mut Fragment,
    block: NodeId,
    claimed_mark: Option<FigureMark>,
) -> NodeId {
    if let Some(previous) = fragment.previous_element_sibling(block)
        && let Some(element) = fragment.element_mut(previous)
        && element.name == "figure"
        && element.mark == Some(FigureMark::Clean)
    {
        element.mark = claimed_mark;
        return previous;
    }

    let figure = fragment.create_element("figure");
    if let Some(element) = fragment.element_mut(figure) {
        element.mark = claimed_mark;
    }
    fragment.insert_before(block, figure);
    figure
}

/// A paragraph holding nothing but images and whitespace.
fn is_image_paragraph(fragment: &Fragment, id: NodeId) -> bool {
    if !fragment.is_element(id, "p") {
        return false;
    }
    let descendants = fragment.descendants(id);
    let mut has_image = false;
    for node in descendants {
        match fragment.tag_name(node) {
            Some("img") => has_image = true,
            Some(_) => return false,
            None => {}
        }
    }
    has_image && fragment.text_content(id).trim().is_empty()
}

/// Replace the text of the block's `code` element with highlighted markup.
fn highlight_code_block(fragment: &mut Fragment, pre: NodeId, highlighter: &dyn Highlighter) {
    let Some(code) = fragment.first_descendant_named(pre, "code") else {
        return;
    };
    let Some(language) = fragment
        .element(code)
        .and_then(|e| e.attrs.get("class"))
        .and_then(|classes| {
            classes
                .split_whitespace()
                .find_map(|class| class.strip_prefix("language-"))
        })
        .filter(|language| *language != "none")
        .map(str::to_owned)
    else {
        return;
    };

    let source = fragment.text_content(code);
    let Some(markup) = highlighter.highlight(&language, &source) else {
        return;
    };
    match Fragment::parse(&markup) {
        Ok(highlighted) => {
            fragment.clear_children(code);
            fragment.append_fragment(code, &highlighted);
        }
        Err(err) => warn!(language = %language, error = %err, "Ignoring unparseable highlight output"),
    }
}

/// Remove `mark` from every element.
pub(crate) fn clear_marks(fragment: &mut Fragment, mark: FigureMark) {
    for id in fragment.descendants(fragment.root()) {
        if let Some(element) = fragment.element_mut(id)
            && element.mark == Some(mark)
        {
            element.mark = None;
        }
    }
}
