//! The document collection contract.

use std::sync::Arc;

use async_trait::async_trait;
use stockroom_core::DocId;

use crate::document::Document;
use crate::error::StoreResult;
use crate::page::Page;
use crate::query::Query;

/// Shared handle to a typed collection.
pub type Collection<T> = Arc<dyn DocumentStore<T>>;

/// Typed document collection.
///
/// Contract notes:
/// - `insert` assigns an identifier when the document carries none and
///   returns it.
/// - `update` targets the document's current identifier and fails with
///   `NotFound` for unknown ids.
/// - `single` fails with `NotFound` when nothing matches; the tolerant
///   variant returns `None` instead. Both fail when more than one document
///   matches.
/// - `query` is the paged read path; prefer the [`Find`] builder.
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    async fn insert(&self, doc: T) -> StoreResult<DocId>;

    async fn update(&self, doc: T) -> StoreResult<DocId>;

    async fn single(&self, query: Query) -> StoreResult<T>;

    async fn single_or_default(&self, query: Query) -> StoreResult<Option<T>>;

    async fn query(
        &self,
        query: Query,
        page: u64,
        size: u64,
        order: &str,
        asc: bool,
    ) -> StoreResult<Page<T>>;
}

/// Fluent read-path entry point: `store.find(query).page(..).order_by(..)`.
pub trait Find<T: Document> {
    fn find(&self, query: Query) -> Finder<'_, T>;
}

impl<T: Document> Find<T> for dyn DocumentStore<T> {
    fn find(&self, query: Query) -> Finder<'_, T> {
        Finder::new(self, query)
    }
}

/// Builder for paged, ordered collection reads.
pub struct Finder<'a, T: Document> {
    store: &'a dyn DocumentStore<T>,
    query: Query,
    page: u64,
    size: u64,
    order: String,
    asc: bool,
}

impl<'a, T: Document> Finder<'a, T> {
    pub fn new(store: &'a dyn DocumentStore<T>, query: Query) -> Self {
        Self {
            store,
            query,
            page: 1,
            size: 20,
            order: "id".to_string(),
            asc: true,
        }
    }

    pub fn page(mut self, page: u64, size: u64) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, asc: bool) -> Self {
        self.order = field.into();
        self.asc = asc;
        self
    }

    pub async fn execute(self) -> StoreResult<Page<T>> {
        self.store
            .query(self.query, self.page, self.size, &self.order, self.asc)
            .await
    }
}
