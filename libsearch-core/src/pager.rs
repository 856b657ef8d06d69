//! Pagination metadata derived from a result count and page size.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Pagination state for one successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub total_items: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub start_page: u32,
    pub end_page: u32,
    pub start_index: u64,
    pub end_index: u64,
    /// Page numbers shown in the page strip.
    pub pages: Vec<u32>,
}

impl Pager {
    /// Compute the pager.
    ///
    /// `current_page` is clamped into the valid range and the strip holds at
    /// most `page_strip` pages around it.
    pub fn new(total_items: u64, current_page: u32, page_size: u32, page_strip: u32) -> CoreResult<Self> {
        if page_size == 0 {
            return Err(CoreError::InvalidPagerSetting {
                field: "page_size",
                reason: "must be > 0".to_string(),
            });
        }
        if page_strip == 0 {
            return Err(CoreError::InvalidPagerSetting {
                field: "page_strip",
                reason: "must be > 0".to_string(),
            });
        }

        let total_pages = u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX);
        let current_page = current_page.clamp(1, total_pages.max(1));

        let (start_page, end_page) = if total_pages == 0 {
            (1, 0)
        } else if total_pages <= page_strip {
            (1, total_pages)
        } else {
            let before = page_strip / 2;
            let after = page_strip - before - 1;
            if current_page <= before + 1 {
                (1, page_strip)
            } else if current_page + after >= total_pages {
                (total_pages - page_strip + 1, total_pages)
            } else {
                (current_page - before, current_page + after)
            }
        };

        let start_index = u64::from(current_page - 1) * u64::from(page_size);
        let end_index = (start_index + u64::from(page_size) - 1).min(total_items.saturating_sub(1));

        Ok(Self {
            total_items,
            current_page,
            page_size,
            total_pages,
            start_page,
            end_page,
            start_index,
            end_index,
            pages: (start_page..=end_page).collect(),
        })
    }

    /// True when `page` names an existing page.
    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let pager = Pager::new(5, 1, 2, 5).unwrap();
        assert_eq!(pager.total_pages, 3);
        assert_eq!(pager.pages, vec![1, 2, 3]);
        assert_eq!(pager.start_index, 0);
        assert_eq!(pager.end_index, 1);
    }

    #[test]
    fn last_page_end_index_stops_at_last_item() {
        let pager = Pager::new(45, 5, 10, 5).unwrap();
        assert_eq!(pager.start_index, 40);
        assert_eq!(pager.end_index, 44);
    }

    #[test]
    fn strip_slides_with_current_page() {
        assert_eq!(Pager::new(200, 1, 10, 5).unwrap().pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(Pager::new(200, 3, 10, 5).unwrap().pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(Pager::new(200, 10, 10, 5).unwrap().pages, vec![8, 9, 10, 11, 12]);
        assert_eq!(Pager::new(200, 19, 10, 5).unwrap().pages, vec![16, 17, 18, 19, 20]);
        assert_eq!(Pager::new(200, 20, 10, 4).unwrap().pages, vec![17, 18, 19, 20]);
    }

    #[test]
    fn current_page_is_clamped() {
        let pager = Pager::new(30, 9, 10, 5).unwrap();
        assert_eq!(pager.current_page, 3);
        assert!(!pager.has_next());
        assert!(pager.has_previous());
    }

    #[test]
    fn empty_count_has_no_pages() {
        let pager = Pager::new(0, 1, 10, 5).unwrap();
        assert_eq!(pager.total_pages, 0);
        assert!(pager.pages.is_empty());
        assert!(!pager.contains(1));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Pager::new(10, 1, 0, 5).is_err());
        assert!(Pager::new(10, 1, 10, 0).is_err());
    }
}
