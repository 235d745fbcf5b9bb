//! Pagination input and output.

/// Read-path paging parameters with the collection defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging {
    /// 1-based page number.
    pub page: u64,
    pub size: u64,
    /// Field name to order by; unknown fields fall back to id order.
    pub order: String,
    pub asc: bool,
    /// Optional keyword filter; each manager decides which fields it matches.
    pub keyword: Option<String>,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            size: 20,
            order: "id".to_string(),
            asc: true,
            keyword: None,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub size: u64,
    /// Total matching documents across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn count(&self) -> usize {
        self.data.len()
    }
}
