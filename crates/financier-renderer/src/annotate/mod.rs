//! Structure annotation of rendered HTML.
//!
//! Runs three passes over a [`Fragment`]:
//!
//! 1. **Figures**: code blocks, tables and image paragraphs are filed into
//!    `figure` containers, joining a preceding caption block when one is free.
//! 2. **Numbering**: top-level headings get hierarchical numbers; captioned
//!    figures get per-kind, per-section numbers on their `figcaption`.
//! 3. **Anchors**: `#id` links copy the numbering of their target.
//!
//! All transient figure marks are cleared before returning.

mod anchors;
mod figures;
mod numbering;

pub use figures::GroupingStats;
pub use numbering::{CaptionCounter, CaptionKind, HeadingCounter, NumberingStats};

use tracing::debug;

use crate::fragment::{FigureMark, Fragment};
use crate::highlight::{Highlighter, NoHighlight};

/// Structure annotator.
pub struct Annotator<'h> {
    highlighter: &'h dyn Highlighter,
}

impl Default for Annotator<'static> {
    fn default() -> Self {
        Self {
            highlighter: &NoHighlight,
        }
    }
}

impl<'h> Annotator<'h> {
    /// Create an annotator that highlights code figures with `highlighter`.
    #[must_use]
    pub fn new(highlighter: &'h dyn Highlighter) -> Self {
        Self { highlighter }
    }

    /// Run all passes over `fragment`.
    pub fn annotate(&self, fragment: &mut Fragment) {
        let grouping = figures::group_figures(fragment, self.highlighter);
        let numbering = numbering::Numbering::default().apply(fragment);
        let anchors = anchors::propagate_anchors(fragment);
        figures::clear_marks(fragment, FigureMark::Clean);
        figures::clear_marks(fragment, FigureMark::Code);

        debug!(
            code = grouping.code,
            tables = grouping.tables,
            images = grouping.images,
            headings = numbering.headings,
            captions = numbering.captions,
            anchors,
            "Annotated fragment"
        );
    }
}
