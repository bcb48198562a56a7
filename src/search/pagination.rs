//! Page slicing and page metadata

use crate::search::config::PER_PAGE_CEILING;
use serde::{Deserialize, Serialize};

/// Page window over a filtered, ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: usize,
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// `per_page` is clamped into `[1, 100]` and `page` raised to at least 1.
    /// `total_pages` is never below 1, even for an empty set.
    pub fn new(total_count: usize, page: u32, per_page: u32) -> Self {
        let per_page = per_page.clamp(1, PER_PAGE_CEILING);
        let current_page = page.max(1);
        let pages = total_count.div_ceil(per_page as usize).max(1);

        Self {
            total_count,
            current_page,
            per_page,
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// Number of items preceding the current page
    pub fn offset(&self) -> usize {
        (self.current_page as usize - 1).saturating_mul(self.per_page as usize)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Take the items of the current page. Items outside the page are dropped
/// without being inspected.
pub fn paginate<T>(items: Vec<T>, pagination: &Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.per_page as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(0, 1, 20).total_pages, 1);
        assert_eq!(Pagination::new(20, 1, 20).total_pages, 1);
        assert_eq!(Pagination::new(21, 1, 20).total_pages, 2);
        assert_eq!(Pagination::new(250, 1, 100).total_pages, 3);
    }

    #[test]
    fn test_clamping() {
        let pagination = Pagination::new(10, 0, 500);
        assert_eq!(pagination.per_page, 100);
        assert_eq!(pagination.current_page, 1);

        assert_eq!(Pagination::new(10, 1, 0).per_page, 1);
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<u32> = (1..=45).collect();

        let page = Pagination::new(items.len(), 3, 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(paginate(items.clone(), &page), vec![41, 42, 43, 44, 45]);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let beyond = Pagination::new(items.len(), 9, 20);
        assert!(paginate(items, &beyond).is_empty());
    }
}
