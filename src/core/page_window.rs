// VoiceMerge - core/page_window.rs
//
// Turns (page count, current page) into the row of page controls shown
// under the table: first and last page, the pages near the current one,
// and a single ellipsis for every run of hidden pages.
// Core layer: pure logic.

use crate::util::constants::PAGE_WINDOW_RADIUS;
use serde::Serialize;

/// One control in the page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageMarker {
    /// A clickable page number (1-based).
    Page { number: usize, current: bool },

    /// Stands in for one or more consecutive hidden pages.
    Ellipsis,
}

impl PageMarker {
    /// Page number, or `None` for an ellipsis.
    pub fn number(&self) -> Option<usize> {
        match self {
            PageMarker::Page { number, .. } => Some(*number),
            PageMarker::Ellipsis => None,
        }
    }
}

/// Whether `page` gets its own control when `current` is selected.
pub fn is_visible(page: usize, page_count: usize, current: usize) -> bool {
    page == 1 || page == page_count || page.abs_diff(current) <= PAGE_WINDOW_RADIUS
}

/// Build the page window.
///
/// `current_page` is 1-based. A `page_count` of 0 is treated as 1 and
/// `current_page` is clamped into `1..=page_count`.
pub fn render(page_count: usize, current_page: usize) -> Vec<PageMarker> {
    let page_count = page_count.max(1);
    let current = current_page.clamp(1, page_count);

    let mut markers = Vec::new();
    let mut collapsed = false;
    for number in 1..=page_count {
        if is_visible(number, page_count, current) {
            collapsed = false;
            markers.push(PageMarker::Page {
                number,
                current: number == current,
            });
        } else if !collapsed {
            collapsed = true;
            markers.push(PageMarker::Ellipsis);
        }
    }
    markers
}
