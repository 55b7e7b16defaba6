//! Pagination control model for the entry list.

use feedback_core::service::feedback_service::page_count;

/// One pagination button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// "Prev" button targeting the given page.
    Prev(u64),
    /// Numbered button; `active` marks the current page.
    Number { page: u64, active: bool },
    /// "Next" button targeting the given page.
    Next(u64),
}

impl PageControl {
    /// Page requested when the control is clicked.
    pub fn target(self) -> u64 {
        match self {
            Self::Prev(page) | Self::Next(page) => page,
            Self::Number { page, .. } => page,
        }
    }
}

/// Builds the controls for `page` of a listing.
///
/// A single page yields no controls at all.
pub fn page_controls(total: u64, page: u64, per_page: u32) -> Vec<PageControl> {
    let pages = page_count(total, per_page);
    if pages <= 1 {
        return Vec::new();
    }

    let mut controls = Vec::new();
    if page > 1 {
        controls.push(PageControl::Prev(page - 1));
    }
    controls.extend((1..=pages).map(|number| PageControl::Number {
        page: number,
        active: number == page,
    }));
    if page < pages {
        controls.push(PageControl::Next(page + 1));
    }
    controls
}
