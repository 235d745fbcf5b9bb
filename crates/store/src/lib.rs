//! `stockroom-store` — document collection contract and in-memory backend.
//!
//! Managers talk to storage exclusively through [`DocumentStore`]: typed
//! collections with insert/update, strict and tolerant single-record fetch,
//! and a paged, ordered query path. [`Db`] hands out named collections so a
//! manager is constructed from `(db, actor)` alone.

pub mod collection;
pub mod db;
pub mod document;
pub mod error;
pub mod memory;
pub mod page;
pub mod query;

pub use collection::{Collection, DocumentStore, Find, Finder};
pub use db::Db;
pub use document::{Document, FieldValue};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryCollection;
pub use page::{Page, Paging};
pub use query::{Clause, Query};
