//! Zero-based pagination bookkeeping for the listing

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl PaginationState {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Index of the following page, `None` on the last page
    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then_some(self.page + 1)
    }

    /// Index of the preceding page, `None` on the first page
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    /// Record the totals of a loaded page, clamping the index into range
    pub fn apply(&mut self, page: u32, total_pages: u32, total_elements: u64) {
        self.total_pages = total_pages;
        self.total_elements = total_elements;
        self.page = if total_pages == 0 { 0 } else { page.min(total_pages - 1) };
    }

    /// Back to page 0 with no totals
    pub fn reset(&mut self) {
        self.page = 0;
        self.total_pages = 0;
        self.total_elements = 0;
    }

    /// "Page 1 of 3"
    pub fn indicator(&self) -> String {
        if self.total_pages == 0 {
            "Page 0 of 0".to_string()
        } else {
            format!("Page {} of {}", self.page + 1, self.total_pages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let mut p = PaginationState::new(10);
        assert_eq!(p.next_page(), None);
        assert_eq!(p.previous_page(), None);

        p.apply(0, 3, 25);
        assert_eq!(p.next_page(), Some(1));
        assert_eq!(p.previous_page(), None);
        assert_eq!(p.indicator(), "Page 1 of 3");

        p.apply(2, 3, 25);
        assert_eq!(p.next_page(), None);
        assert_eq!(p.previous_page(), Some(1));
    }

    #[test]
    fn test_apply_clamps_into_range() {
        let mut p = PaginationState::new(10);
        p.apply(5, 2, 15);
        assert_eq!(p.page, 1);

        p.apply(3, 0, 0);
        assert_eq!(p.page, 0);
        assert_eq!(p.indicator(), "Page 0 of 0");
    }

    #[test]
    fn test_zero_size_is_lifted() {
        assert_eq!(PaginationState::new(0).size, 1);
    }
}
