//! In-memory collection backend.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use stockroom_core::DocId;

use crate::collection::DocumentStore;
use crate::document::{Document, FieldValue};
use crate::error::{StoreError, StoreResult};
use crate::page::Page;
use crate::query::Query;

/// In-memory `DocumentStore` for tests/dev.
#[derive(Debug)]
pub struct InMemoryCollection<T> {
    docs: RwLock<HashMap<DocId, T>>,
}

impl<T> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn cmp_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(FieldValue::Id(x)), Some(FieldValue::Id(y))) => x.cmp(y),
        (Some(FieldValue::Str(x)), Some(FieldValue::Str(y))) => x.cmp(y),
        (Some(FieldValue::Int(x)), Some(FieldValue::Int(y))) => x.cmp(y),
        (Some(FieldValue::Bool(x)), Some(FieldValue::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

impl<T: Document> InMemoryCollection<T> {
    fn matching(&self, query: &Query) -> StoreResult<Vec<T>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        Ok(docs.values().filter(|d| query.matches(*d)).cloned().collect())
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for InMemoryCollection<T> {
    async fn insert(&self, mut doc: T) -> StoreResult<DocId> {
        let id = match doc.id() {
            Some(id) => id,
            None => {
                let id = DocId::new();
                doc.set_id(id);
                id
            }
        };

        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        if docs.contains_key(&id) {
            return Err(StoreError::Backend(format!(
                "duplicate document id on insert: {id}"
            )));
        }
        docs.insert(id, doc);
        Ok(id)
    }

    async fn update(&self, doc: T) -> StoreResult<DocId> {
        let id = doc.id().ok_or(StoreError::NotFound)?;
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        if !docs.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        docs.insert(id, doc);
        Ok(id)
    }

    async fn single(&self, query: Query) -> StoreResult<T> {
        self.single_or_default(query).await?.ok_or(StoreError::NotFound)
    }

    async fn single_or_default(&self, query: Query) -> StoreResult<Option<T>> {
        let mut matches = self.matching(&query)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(StoreError::NotSingle),
        }
    }

    async fn query(
        &self,
        query: Query,
        page: u64,
        size: u64,
        order: &str,
        asc: bool,
    ) -> StoreResult<Page<T>> {
        let mut matches = self.matching(&query)?;

        matches.sort_by(|a, b| {
            let ord = cmp_values(a.field(order).as_ref(), b.field(order).as_ref())
                // Stable tie-break on id so pagination never shuffles.
                .then_with(|| a.id().cmp(&b.id()));
            if asc { ord } else { ord.reverse() }
        });

        let total = matches.len() as u64;
        let skip = page.saturating_sub(1).saturating_mul(size) as usize;
        let data: Vec<T> = matches.into_iter().skip(skip).take(size as usize).collect();

        Ok(Page {
            data,
            page,
            size,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collection::{Collection, Find};
    use stockroom_core::AuditStamp;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Note {
        id: Option<DocId>,
        code: String,
        rank: i64,
        deleted: bool,
        audit: AuditStamp,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> Option<DocId> {
            self.id
        }

        fn set_id(&mut self, id: DocId) {
            self.id = Some(id);
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => self.id.map(FieldValue::Id),
                "code" => Some(self.code.clone().into()),
                "rank" => Some(self.rank.into()),
                "deleted" => Some(self.deleted.into()),
                _ => None,
            }
        }

        fn audit_mut(&mut self) -> &mut AuditStamp {
            &mut self.audit
        }
    }

    fn note(code: &str, rank: i64) -> Note {
        Note {
            code: code.to_string(),
            rank,
            ..Note::default()
        }
    }

    #[tokio::test]
    async fn insert_assigns_an_id_and_single_finds_it() {
        let store = InMemoryCollection::new();
        let id = store.insert(note("A", 1)).await.unwrap();

        let found = store.single(Query::new().eq("id", id)).await.unwrap();
        assert_eq!(found.code, "A");
        assert_eq!(found.id, Some(id));
    }

    #[tokio::test]
    async fn single_is_strict_and_or_default_is_tolerant() {
        let store: InMemoryCollection<Note> = InMemoryCollection::new();
        let missing = Query::new().eq("code", "missing");

        assert_eq!(store.single(missing.clone()).await, Err(StoreError::NotFound));
        assert_eq!(store.single_or_default(missing).await, Ok(None));
    }

    #[tokio::test]
    async fn single_rejects_ambiguous_matches() {
        let store = InMemoryCollection::new();
        store.insert(note("X", 1)).await.unwrap();
        store.insert(note("X", 2)).await.unwrap();

        let result = store.single_or_default(Query::new().eq("code", "X")).await;
        assert_eq!(result, Err(StoreError::NotSingle));
    }

    #[tokio::test]
    async fn update_requires_an_existing_document() {
        let store = InMemoryCollection::new();
        let mut orphan = note("Z", 0);
        orphan.id = Some(DocId::new());
        assert_eq!(store.update(orphan).await, Err(StoreError::NotFound));

        let id = store.insert(note("Z", 0)).await.unwrap();
        let mut stored = store.single(Query::new().eq("id", id)).await.unwrap();
        stored.rank = 9;
        assert_eq!(store.update(stored).await, Ok(id));
        let reread = store.single(Query::new().eq("id", id)).await.unwrap();
        assert_eq!(reread.rank, 9);
    }

    #[tokio::test]
    async fn query_pages_and_orders() {
        let store: Collection<Note> = Arc::new(InMemoryCollection::new());
        for (code, rank) in [("C", 3), ("A", 1), ("D", 4), ("B", 2)] {
            store.insert(note(code, rank)).await.unwrap();
        }

        let page = store
            .find(Query::new())
            .page(1, 2)
            .order_by("code", true)
            .execute()
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(
            page.data.iter().map(|n| n.code.as_str()).collect::<Vec<_>>(),
            ["A", "B"]
        );

        let last = store
            .find(Query::new())
            .page(2, 2)
            .order_by("rank", false)
            .execute()
            .await
            .unwrap();
        assert_eq!(
            last.data.iter().map(|n| n.rank).collect::<Vec<_>>(),
            [2, 1]
        );
    }

    #[tokio::test]
    async fn contains_is_case_insensitive() {
        let store: Collection<Note> = Arc::new(InMemoryCollection::new());
        store.insert(note("TRF-OUT-001", 1)).await.unwrap();
        store.insert(note("TRF-IN-002", 2)).await.unwrap();

        let page = store
            .find(Query::new().contains("code", "out"))
            .page(1, 20)
            .order_by("id", true)
            .execute()
            .await
            .unwrap();
        assert_eq!(page.count(), 1);
        assert_eq!(page.data[0].code, "TRF-OUT-001");
    }

    #[tokio::test]
    async fn ne_clause_excludes_matching_ids() {
        let store = InMemoryCollection::new();
        let first = store.insert(note("SAME", 1)).await.unwrap();
        let second = store.insert(note("SAME", 2)).await.unwrap();

        let other = store
            .single(Query::new().eq("code", "SAME").ne("id", first))
            .await
            .unwrap();
        assert_eq!(other.id, Some(second));
    }
}
