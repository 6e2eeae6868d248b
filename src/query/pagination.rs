//! Page arithmetic for the issue list.

use std::fmt;

use serde::Serialize;

/// Issues per page. Fixed: nothing observable depends on it being configurable.
pub const PAGE_SIZE: u32 = 5;

/// Number of pages needed to show `total` items. Never less than one, so an
/// empty result still has a page to sit on.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamp a requested page (possibly zero, negative or huge) into `[1, total_pages]`.
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let upper = i64::from(total_pages.max(1));
    // bounded by upper, which came from a u32
    requested.clamp(1, upper) as u32
}

/// The "showing X to Y of Z" bounds of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl PageRange {
    pub fn bounds(&self) -> (u64, u64) {
        (self.start, self.end)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {}",
            self.start, self.end, self.total
        )
    }
}

/// Bounds shown for `page`. Both are zero when there is nothing to show.
pub fn range_label(page: u32, page_size: u32, total: u64) -> PageRange {
    let page = u64::from(page.max(1));
    let page_size = u64::from(page_size);
    let start = ((page - 1) * page_size + 1).min(total);
    let end = (page * page_size).min(total);
    PageRange { start, end, total }
}
