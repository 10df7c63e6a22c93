/// How much of the remote collection exists and how much of it is loaded.
///
/// The value is `Copy` and is replaced as a whole on every successful
/// response, never patched field by field from different call sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based index of the last page merged into the mirror; 0 before
    /// the first load.
    pub page: u64,
    /// Page size used for the pages loaded so far.
    pub limit: u64,
    /// Server-reported count for the active query, adjusted by confirmed
    /// local creates and deletes.
    pub total: u64,
}

impl PaginationState {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self { page, limit, total }
    }

    /// `ceil(total / limit)`; zero when no limit is set yet.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    pub fn with_total(self, total: u64) -> Self {
        Self { total, ..self }
    }

    /// Page holding the first record not covered yet, given that `shift`
    /// loaded records were deleted since `page` was merged. Each deletion
    /// pulls the server's later records one offset down, so a page may have
    /// to be requested again.
    pub fn next_page(&self, shift: u64) -> u64 {
        if self.limit == 0 {
            return self.page + 1;
        }
        let covered = (self.page * self.limit).saturating_sub(shift);
        covered / self.limit + 1
    }

    /// State after merging `page`.
    pub fn merged(self, page: u64, total: u64) -> Self {
        Self {
            page,
            total,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PaginationState::new(1, 100, 1200).total_pages(), 12);
        assert_eq!(PaginationState::new(1, 100, 1201).total_pages(), 13);
        assert_eq!(PaginationState::new(1, 500, 437).total_pages(), 1);
        assert_eq!(PaginationState::new(1, 10, 0).total_pages(), 0);
    }

    #[test]
    fn unset_limit_has_no_pages() {
        assert_eq!(PaginationState::default().total_pages(), 0);
    }

    #[test]
    fn merged_keeps_limit() {
        let next = PaginationState::new(2, 100, 1200).merged(3, 1200);
        assert_eq!(next, PaginationState::new(3, 100, 1200));
    }

    #[test]
    fn next_page_rewinds_after_deletes() {
        let state = PaginationState::new(4, 100, 1199);
        assert_eq!(state.next_page(0), 5);
        assert_eq!(state.next_page(1), 4);
        assert_eq!(state.next_page(100), 4);
        assert_eq!(state.next_page(101), 3);
        assert_eq!(state.next_page(1_000), 1);
    }
}
