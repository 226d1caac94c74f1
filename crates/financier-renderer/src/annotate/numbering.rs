//! Hierarchical heading numbers and per-section caption numbers.
//!
//! Only direct children of the root take part: headings advance the heading
//! counter vector and captioned figures draw the next number of their kind.

use std::fmt;

use crate::fragment::{Fragment, NodeId};
use crate::util::heading_level_of;

/// Content kind of a captioned figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptionKind {
    Code,
    Table,
    Image,
}

impl CaptionKind {
    /// Marker attribute stamped on the figcaption.
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Code => "data-code",
            Self::Table => "data-table",
            Self::Image => "data-image",
        }
    }

    /// Classify a figure by the first content kind it contains.
    fn of_figure(fragment: &Fragment, figure: NodeId) -> Option<Self> {
        if fragment.first_descendant_named(figure, "pre").is_some() {
            Some(Self::Code)
        } else if fragment.first_descendant_named(figure, "table").is_some() {
            Some(Self::Table)
        } else if fragment.first_descendant_named(figure, "img").is_some() {
            Some(Self::Image)
        } else {
            None
        }
    }
}

impl fmt::Display for CaptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Code => "code",
            Self::Table => "table",
            Self::Image => "image",
        })
    }
}

/// Running heading numbers, one entry per level down to the current depth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadingCounter {
    levels: Vec<u32>,
}

impl HeadingCounter {
    /// Enter a heading of `level` (1-6).
    ///
    /// Deeper entries are dropped, missing shallower entries start at zero.
    pub fn enter(&mut self, level: usize) {
        self.levels.resize(level, 0);
        if let Some(last) = self.levels.last_mut() {
            *last += 1;
        }
    }

    #[must_use]
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }
}

/// Numbering state of one caption kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptionCounter {
    /// Captions of this kind so far.
    total: u32,
    /// Heading vector at the previous caption of this kind.
    last_seen: Vec<u32>,
    /// Captions since the heading at each depth last changed.
    level_totals: Vec<u32>,
}

impl CaptionCounter {
    /// Count a caption under the heading vector `headings`.
    pub fn advance(&mut self, headings: &[u32]) {
        let changed_from = headings
            .iter()
            .enumerate()
            .position(|(i, value)| self.last_seen.get(i) != Some(value))
            .unwrap_or(headings.len());

        self.last_seen.truncate(changed_from);
        self.last_seen.extend_from_slice(&headings[changed_from..]);
        self.level_totals.resize(changed_from.min(self.level_totals.len()), 0);
        self.level_totals.resize(headings.len(), 0);

        self.total += 1;
        for count in &mut self.level_totals {
            *count += 1;
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn level_totals(&self) -> &[u32] {
        &self.level_totals
    }
}

/// Numbering state for a whole document.
#[derive(Clone, Debug, Default)]
pub struct Numbering {
    headings: HeadingCounter,
    code: CaptionCounter,
    table: CaptionCounter,
    image: CaptionCounter,
}

/// Counts of stamped elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumberingStats {
    pub headings: usize,
    pub captions: usize,
}

impl Numbering {
    fn counter_mut(&mut self, kind: CaptionKind) -> &mut CaptionCounter {
        match kind {
            CaptionKind::Code => &mut self.code,
            CaptionKind::Table => &mut self.table,
            CaptionKind::Image => &mut self.image,
        }
    }

    /// Stamp every top-level heading and captioned figure.
    pub(crate) fn apply(mut self, fragment: &mut Fragment) -> NumberingStats {
        let mut stats = NumberingStats::default();
        let children: Vec<NodeId> = fragment.element_children(fragment.root()).collect();

        for id in children {
            let level = fragment.tag_name(id).and_then(heading_level_of);
            if let Some(level) = level {
                self.headings.enter(level);
                stamp_heading(fragment, id, self.headings.levels());
                stats.headings += 1;
            } else if fragment.is_element(id, "figure")
                && let Some(caption) = fragment.first_descendant_named(id, "figcaption")
                && let Some(kind) = CaptionKind::of_figure(fragment, id)
            {
                let headings = self.headings.levels().to_vec();
                let counter = self.counter_mut(kind);
                counter.advance(&headings);
                stamp_caption(fragment, caption, kind, &headings, counter);
                stats.captions += 1;
            }
        }

        stats
    }
}

fn stamp_heading(fragment: &mut Fragment, heading: NodeId, levels: &[u32]) {
    let Some(element) = fragment.element_mut(heading) else {
        return;
    };
    element.attrs.set("data-header", "");
    for (i, value) in levels.iter().enumerate() {
        element.attrs.set(format!("data-h{}", i + 1), value.to_string());
    }
}

fn stamp_caption(
    fragment: &mut Fragment,
    caption: NodeId,
    kind: CaptionKind,
    headings: &[u32],
    counter: &CaptionCounter,
) {
    let Some(element) = fragment.element_mut(caption) else {
        return;
    };
    element.attrs.set(kind.attribute(), "");
    element.attrs.set("data-total", counter.total().to_string());
    for (i, (value, total)) in headings.iter().zip(counter.level_totals()).enumerate() {
        element.attrs.set(format!("data-h{}", i + 1), value.to_string());
        element
            .attrs
            .set(format!("data-h{}-total", i + 1), total.to_string());
    }
}
