//! Data models shared by the news loader and the news list generator.
//!
//! - [`PaginationState`]: how many news items are rendered on the listing page
//! - [`NewsFileRecord`]: a published news document and its publication time

use chrono::NaiveDateTime;

/// Pagination counter for the news listing page.
///
/// `loaded` starts at one page and only grows. It never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    loaded: usize,
    total: usize,
    page_size: usize,
}

impl PaginationState {
    /// Start a session with the first page already rendered.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of news files in the list
    /// * `page_size` - Items rendered per page and per batch
    ///
    /// # Returns
    ///
    /// A state with `loaded = min(page_size, total)`.
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            loaded: page_size.min(total),
            total,
            page_size,
        }
    }

    /// Number of items currently rendered.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Length of the news file list.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Items added per batch.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// True once every item is rendered.
    pub fn is_exhausted(&self) -> bool {
        self.loaded >= self.total
    }

    /// End index (exclusive) of the next batch.
    ///
    /// A batch that would leave at most half a page behind is stretched to
    /// the end of the list.
    pub fn batch_end(&self) -> usize {
        let next_target = self.loaded.saturating_add(self.page_size);
        let end = self.total.min(next_target);
        if ((self.total - end) as f64) <= (self.page_size as f64) / 2.0 {
            self.total
        } else {
            end
        }
    }

    /// Record that items up to `end` are now rendered.
    pub(crate) fn advance_to(&mut self, end: usize) {
        self.loaded = self.loaded.max(end.min(self.total));
    }
}

/// A news document together with its publication timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsFileRecord {
    /// When the news post was first published.
    pub published: NaiveDateTime,
    /// Filename of the HTML document inside the news directory.
    pub filename: String,
}

impl NewsFileRecord {
    /// Pair a filename with its publication time.
    pub fn new(published: NaiveDateTime, filename: impl Into<String>) -> Self {
        Self {
            published,
            filename: filename.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_one_page() {
        let state = PaginationState::new(10, 4);
        assert_eq!(state.loaded(), 4);
        assert!(!state.is_exhausted());
    }

    #[test]
    fn test_initial_state_capped_at_total() {
        let state = PaginationState::new(2, 4);
        assert_eq!(state.loaded(), 2);
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_snap_fires_at_half_page() {
        // 10 - 8 = 2 <= 4 / 2
        let state = PaginationState::new(10, 4);
        assert_eq!(state.batch_end(), 10);
    }

    #[test]
    fn test_snap_uses_real_division() {
        let mut state = PaginationState::new(10, 3);
        // 10 - 6 = 4 > 1.5
        assert_eq!(state.batch_end(), 6);
        state.advance_to(6);
        // 10 - 9 = 1 <= 1.5
        assert_eq!(state.batch_end(), 10);
        state.advance_to(10);
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_advance_never_decreases_or_overflows() {
        let mut state = PaginationState::new(10, 3);
        state.advance_to(2);
        assert_eq!(state.loaded(), 3);
        state.advance_to(40);
        assert_eq!(state.loaded(), 10);
        assert_eq!(state.batch_end(), 10);
    }

    #[test]
    fn test_huge_page_size_does_not_overflow() {
        let state = PaginationState::new(3, usize::MAX);
        assert_eq!(state.loaded(), 3);
        assert_eq!(state.batch_end(), 3);

        let mut state = PaginationState::new(10, usize::MAX - 1);
        state.loaded = 4;
        assert_eq!(state.batch_end(), 10);
    }

    #[test]
    fn test_news_file_record_creation() {
        let published = NaiveDateTime::parse_from_str("2025-05-06 08:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let record = NewsFileRecord::new(published, "launch.html");
        assert_eq!(record.filename, "launch.html");
        assert_eq!(record.published, published);
    }
}
