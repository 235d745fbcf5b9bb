//! Document trait: what a record must expose to live in a collection.

use stockroom_core::{AuditStamp, DocId};

/// A field value usable in queries and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Id(DocId),
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<DocId> for FieldValue {
    fn from(value: DocId) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A record persistable in a [`crate::DocumentStore`].
///
/// `field` is the query surface: it exposes named fields for filter matching
/// and ordering. Every document answers at least `"id"` and `"deleted"`.
pub trait Document: Clone + Send + Sync + 'static {
    /// Collection name this document type is stored under.
    const COLLECTION: &'static str;

    /// Identifier; `None` until first insert.
    fn id(&self) -> Option<DocId>;

    fn set_id(&mut self, id: DocId);

    /// Named field lookup for query matching and ordering. Unknown fields
    /// return `None` and never match an equality filter.
    fn field(&self, name: &str) -> Option<FieldValue>;

    fn audit_mut(&mut self) -> &mut AuditStamp;

    /// Stamp a write with the acting user and origin marker.
    fn stamp(&mut self, user: &str, origin: &str) {
        self.audit_mut().stamp(user, origin);
    }
}
