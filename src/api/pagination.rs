use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Offset/limit query parameters shared by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PageQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// List envelope: total match count plus the requested window.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: usize,
    pub limit: usize,
    pub offset: usize,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wraps the full (already ordered) result set, keeping only the
    /// requested window. `count` reflects the total before slicing.
    pub fn new(page: &PageQuery, items: Vec<T>) -> Self {
        let count = items.len();
        let results = items.into_iter().skip(page.offset()).take(page.limit()).collect();
        Self {
            count,
            limit: page.limit(),
            offset: page.offset(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageQuery::default();
        assert_eq!(page.limit(), DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let page = PageQuery { limit: Some(10_000), offset: None };
        assert_eq!(page.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_window_slicing() {
        let page = PageQuery { limit: Some(2), offset: Some(1) };
        let envelope = Paginated::new(&page, vec![1, 2, 3, 4]);
        assert_eq!(envelope.count, 4);
        assert_eq!(envelope.results, vec![2, 3]);
    }

    #[test]
    fn test_offset_past_end_yields_empty_page() {
        let page = PageQuery { limit: None, offset: Some(10) };
        let envelope = Paginated::new(&page, vec![1, 2]);
        assert_eq!(envelope.count, 2);
        assert!(envelope.results.is_empty());
    }
}
