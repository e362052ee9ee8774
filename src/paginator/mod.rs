use std::ops::Range;

/// Max number of slots the page-button legend may hold, Previous and Next
/// included. Data sets that need more pages than fit here are still fully
/// reachable by repeatedly advancing with Next.
pub const PAGE_LIMIT: usize = 15;

/// Number of rows shown per page unless the viewer picks another amount.
pub const DEFAULT_PAGE_LENGTH: i64 = 5;

/// Page length value meaning "unbounded, show the whole set".
pub const PAGE_LENGTH_ALL: i64 = -1;

/// One control in the page-button legend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendSlot {
    Previous,
    Page(usize),
    Next,
}

/// Pagination state for one table view. Owned by a single controller and
/// only ever replaced through `apply` and `reconcile`, so every transition
/// is a pure `(state, event) -> state` step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageState {
    /// Index of the first visible record in the filtered set.
    pub page_start: usize,
    /// Rows per page, or `PAGE_LENGTH_ALL` for the whole set.
    pub page_length: i64,
    /// 1-based number of the currently active page.
    pub active_page: usize,
    /// Legend slot count from the previous build, kept so a shrinking
    /// legend can recover the active page.
    pub last_slot_count: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_start: 0,
            page_length: DEFAULT_PAGE_LENGTH,
            active_page: 1,
            last_slot_count: 0,
        }
    }
}

/// A user interaction that moves the pagination state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// Search text changed; the view snaps back to the first page so the
    /// active button cannot point at a page the filter removed.
    Search,
    /// The rows-per-page selector changed.
    PageLength(i64),
    /// A legend button was clicked.
    Click(LegendSlot),
}

/// Number of pages the filtered set occupies at the given page length.
/// Unbounded display always fits on one page.
pub fn page_count(len: usize, page_length: i64) -> usize {
    if page_length <= 0 {
        return usize::from(len > 0);
    }
    let per_page = page_length as usize;
    (len + per_page - 1) / per_page
}

/// Legend size before suppression: one slot per page plus Previous and
/// Next, capped at `PAGE_LIMIT`.
pub fn legend_slot_count(len: usize, page_length: i64) -> usize {
    if page_length <= 0 {
        return 0;
    }
    (page_count(len, page_length) + 2).min(PAGE_LIMIT)
}

/// Build the legend for the filtered set, or `None` when navigation is
/// pointless: unbounded display, or everything fits on a single page
/// (three or fewer slots would collapse to Previous + 1 + Next).
pub fn build_legend(len: usize, page_length: i64) -> Option<Vec<LegendSlot>> {
    let slots = legend_slot_count(len, page_length);
    if slots <= 3 {
        return None;
    }
    let mut legend = Vec::with_capacity(slots);
    legend.push(LegendSlot::Previous);
    for page in 1..=(slots - 2) {
        legend.push(LegendSlot::Page(page));
    }
    legend.push(LegendSlot::Next);
    Some(legend)
}

impl PageState {
    /// Apply a user interaction against the current filtered length.
    pub fn apply(&self, event: &PageEvent, len: usize) -> PageState {
        let mut next = self.clone();
        match event {
            PageEvent::Search => {
                next.page_start = 0;
                next.active_page = 1;
            }
            PageEvent::PageLength(length) => {
                next.page_length = *length;
                next.page_start = 0;
                next.active_page = 1;
            }
            PageEvent::Click(slot) => {
                if next.page_length <= 0 {
                    return next;
                }
                let pages = page_count(len, next.page_length).max(1);
                let active = match slot {
                    LegendSlot::Previous => next.active_page.saturating_sub(1).max(1),
                    LegendSlot::Next => (next.active_page + 1).min(pages),
                    LegendSlot::Page(page) => (*page).clamp(1, pages),
                };
                next.active_page = active;
                next.page_start = next.page_length as usize * (active - 1);
            }
        }
        next
    }

    /// Reconcile the state against the latest filtered length and produce
    /// the visible window. Handles the three churn cases: a legend that
    /// shrank out from under the active page, a stale `page_start` past the
    /// end of a set that shrank, and a set that emptied entirely.
    pub fn reconcile(&self, len: usize) -> (PageState, Range<usize>) {
        let mut next = self.clone();

        if next.page_length <= 0 {
            next.page_start = 0;
            next.active_page = 1;
            next.last_slot_count = 0;
            return (next, 0..len);
        }
        let per_page = next.page_length as usize;

        let slots = legend_slot_count(len, next.page_length);
        let interior = slots.saturating_sub(2);
        if interior <= 1 {
            next.active_page = 1;
        } else if slots < next.last_slot_count && next.active_page > interior {
            // The active page no longer exists: fall back to the nearest
            // lower page, never past the last valid one.
            let pages = page_count(len, next.page_length).max(1);
            next.active_page = next.active_page.saturating_sub(1).clamp(1, pages);
            next.page_start = per_page * (next.active_page - 1);
        }
        next.last_slot_count = slots;

        let mut start = next.page_start;
        let mut end = (start + per_page).min(len);
        if start + 1 > end {
            start = end.saturating_sub(per_page);
        }
        if len == 0 {
            start = 0;
        }
        end = (start + per_page).min(len);
        next.page_start = start;

        (next, start..end)
    }
}
