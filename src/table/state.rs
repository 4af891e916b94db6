use crate::models::page::page_count;
use crate::models::ListQuery;

/// Pagination and search state of one table.
///
/// `page_index` is zero-based. Changing the search term or the page size
/// always returns to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    page_index: usize,
    page_size: usize,
    search: String,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            search: String::new(),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page_index = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    /// Jump to a page, clamped to the last page for `total` rows.
    pub fn set_page(&mut self, page_index: usize, total: usize) {
        let last = page_count(total, self.page_size).saturating_sub(1);
        self.page_index = page_index.min(last);
    }

    /// Returns `false` when already on the last page.
    pub fn next_page(&mut self, total: usize) -> bool {
        if self.page_index + 1 < page_count(total, self.page_size) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.page_index, self.page_size).with_search(&self.search)
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_resets_to_first_page() {
        let mut state = TableState::new(10);
        assert!(state.next_page(35));
        assert!(state.next_page(35));
        assert_eq!(state.page_index(), 2);

        state.set_search("amox");
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.query().search.as_deref(), Some("amox"));
    }

    #[test]
    fn paging_stops_at_bounds() {
        let mut state = TableState::new(10);
        assert!(!state.prev_page());
        assert!(state.next_page(11));
        assert!(!state.next_page(11));
        assert_eq!(state.page_index(), 1);
        assert!(!TableState::new(10).next_page(0));
    }

    #[test]
    fn page_size_change_resets_and_clamps() {
        let mut state = TableState::new(5);
        state.set_page(3, 40);
        assert_eq!(state.page_index(), 3);
        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
        assert_eq!(state.page_index(), 0);
        state.set_page(99, 4);
        assert_eq!(state.page_index(), 3);
    }
}
