//! Offset pagination primitives for listing endpoints.
//!
//! Listings are paginated with a 1-based page number and a fixed page
//! size. A request past the end of the collection yields an empty page
//! rather than an error so callers can render "no results" pages.

use serde::Serialize;

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The page size must be at least one row.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// A validated request for one page of an ordered collection.
///
/// ## Invariants
/// - `page` is 1-based; zero is normalised to the first page.
/// - `per_page` is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request for `page` with `per_page` rows per page.
    pub fn new(page: u32, per_page: u32) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self {
            page: page.max(1),
            per_page,
        })
    }

    /// The 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset for SQL `OFFSET` clauses.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Row limit for SQL `LIMIT` clauses.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// One page of results plus the figures needed to render page links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    per_page: u32,
    total: u64,
}

impl<T> Page<T> {
    /// Assemble a page from fetched rows and the collection total.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total,
        }
    }

    /// Rows on this page. Empty when the page is past the end.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The 1-based page number this page was fetched for.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page used for the fetch.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total rows in the underlying collection.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to cover the whole collection.
    ///
    /// An empty collection still has one (empty) page.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page);
        let pages = self.total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Map the row type while keeping the pagination figures.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 5, 0)]
    #[case(2, 5, 5)]
    #[case(4, 5, 15)]
    #[case(3, 10, 20)]
    fn offsets_follow_page_number(#[case] page: u32, #[case] per_page: u32, #[case] offset: i64) {
        let request = PageRequest::new(page, per_page).expect("valid request");
        assert_eq!(request.offset(), offset);
        assert_eq!(request.limit(), i64::from(per_page));
    }

    #[test]
    fn zero_page_is_normalised_to_first() {
        let request = PageRequest::new(0, 5).expect("valid request");
        assert_eq!(request.page(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(
            PageRequest::new(1, 0),
            Err(PaginationError::ZeroPageSize)
        );
    }

    #[rstest]
    #[case(12, 5, 3)]
    #[case(10, 5, 2)]
    #[case(1, 5, 1)]
    #[case(0, 5, 1)]
    fn total_pages_cover_the_collection(
        #[case] total: u64,
        #[case] per_page: u32,
        #[case] expected: u32,
    ) {
        let request = PageRequest::new(1, per_page).expect("valid request");
        let page: Page<u8> = Page::new(Vec::new(), request, total);
        assert_eq!(page.total_pages(), expected);
    }

    #[test]
    fn page_links_reflect_position() {
        let request = PageRequest::new(2, 5).expect("valid request");
        let page = Page::new(vec![1, 2, 3, 4, 5], request, 12);
        assert!(page.has_prev());
        assert!(page.has_next());

        let request = PageRequest::new(3, 5).expect("valid request");
        let page = Page::new(vec![11, 12], request, 12);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn past_the_end_page_is_empty_not_an_error() {
        let request = PageRequest::new(4, 5).expect("valid request");
        let page: Page<u8> = Page::new(Vec::new(), request, 12);
        assert!(page.items().is_empty());
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn map_preserves_figures() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let page = Page::new(vec![1, 2], request, 4).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.total(), 4);
        assert_eq!(page.per_page(), 2);
    }
}
