use serde::Serialize;

/// Posts per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 2;

const MAX_SQL_OFFSET: u64 = i64::MAX as u64;

/// A resolved page window. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Absent, zero and negative page numbers all resolve to the first page.
    pub fn new(page: Option<i64>, page_size: u64) -> Self {
        let page = match page {
            Some(p) if p > 0 => p as u64,
            _ => 1,
        };
        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    /// Number of items to skip: `(page - 1) * page_size`, capped at `i64::MAX`
    /// so it always binds as a SQL `BIGINT`.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(MAX_SQL_OFFSET)
    }

    pub fn limit(&self) -> u64 {
        self.page_size.min(MAX_SQL_OFFSET)
    }
}

/// One window of results plus the unfiltered total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_pages_resolve_to_first() {
        for page in [None, Some(0), Some(-1), Some(i64::MIN)] {
            let req = PageRequest::new(page, DEFAULT_PAGE_SIZE);
            assert_eq!(req.page, 1);
            assert_eq!(req.offset(), 0);
        }
    }

    #[test]
    fn test_offset_arithmetic() {
        let req = PageRequest::new(Some(3), 2);
        assert_eq!(req.offset(), 4);
        assert_eq!(req.limit(), 2);

        let req = PageRequest::new(Some(5), 10);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let req = PageRequest::new(Some(2), 0);
        assert_eq!(req.page_size, 1);
        assert_eq!(req.offset(), 1);
    }

    #[test]
    fn test_huge_page_offset_fits_bigint() {
        let req = PageRequest::new(Some(i64::MAX), 2);
        assert_eq!(req.offset(), i64::MAX as u64);
        assert!(i64::try_from(req.offset()).is_ok());

        let req = PageRequest::new(Some(2), u64::MAX);
        assert!(i64::try_from(req.limit()).is_ok());
    }
}
