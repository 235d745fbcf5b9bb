//! Database handle: a registry of named, typed collections.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::collection::Collection;
use crate::document::Document;
use crate::memory::InMemoryCollection;

/// Hands out shared typed collections keyed by [`Document::COLLECTION`].
///
/// Managers are constructed from `(db, actor)`; the first request for a
/// collection creates it, later requests share the same backing store.
#[derive(Debug, Default)]
pub struct Db {
    collections: RwLock<HashMap<&'static str, Arc<dyn Any + Send + Sync>>>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection<T: Document>(&self) -> Collection<T> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match collections.get(T::COLLECTION) {
            Some(existing) => existing
                .clone()
                .downcast::<InMemoryCollection<T>>()
                .expect("collection name registered with a different document type"),
            None => {
                let created = Arc::new(InMemoryCollection::<T>::new());
                collections.insert(T::COLLECTION, created.clone());
                created
            }
        }
    }
}
