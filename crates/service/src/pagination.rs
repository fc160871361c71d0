//! Page arithmetic shared by the repository and the envelopes.

/// 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index; 0 is read as 1
    pub page: u64,
    /// rows per page; 0 means an empty page
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self { Self { page, per_page } }

    /// `(offset, limit)` of the page in a key-ordered result set.
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.max(1);
        ((page - 1).saturating_mul(self.per_page), self.per_page)
    }

    pub fn is_empty(&self) -> bool { self.per_page == 0 }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn page_zero_reads_as_first_page() {
        assert_eq!(Pagination::new(0, 10).normalize(), (0, 10));
        assert_eq!(Pagination::new(1, 10).normalize(), (0, 10));
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(Pagination::new(3, 10).normalize(), (20, 10));
        assert_eq!(Pagination::new(u64::MAX, u64::MAX).normalize().0, u64::MAX);
    }

    #[test]
    fn zero_page_size_is_empty() {
        assert!(Pagination::new(2, 0).is_empty());
        assert_eq!(Pagination::default(), Pagination::new(1, 10));
    }
}
