//! Structured document queries.
//!
//! A [`Query`] is a conjunction of clauses evaluated against
//! [`Document::field`]. Disjunctions nest through [`Clause::AnyOf`].

use crate::document::{Document, FieldValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Field equals value. Missing fields never match.
    Eq(String, FieldValue),
    /// Field differs from value. Missing fields match.
    Ne(String, FieldValue),
    /// Case-insensitive substring match on a string field.
    Contains(String, String),
    /// Any of the nested clauses matches.
    AnyOf(Vec<Clause>),
}

impl Clause {
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn contains(field: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::Contains(field.into(), fragment.into())
    }

    pub fn matches<T: Document>(&self, doc: &T) -> bool {
        match self {
            Clause::Eq(field, value) => doc.field(field).as_ref() == Some(value),
            Clause::Ne(field, value) => doc.field(field).as_ref() != Some(value),
            Clause::Contains(field, fragment) => match doc.field(field) {
                Some(FieldValue::Str(s)) => {
                    s.to_lowercase().contains(&fragment.to_lowercase())
                }
                _ => false,
            },
            Clause::AnyOf(clauses) => clauses.iter().any(|c| c.matches(doc)),
        }
    }
}

/// Conjunction of clauses. An empty query matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.clauses.push(Clause::Eq(field.into(), value.into()));
        self
    }

    pub fn ne(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.clauses.push(Clause::Ne(field.into(), value.into()));
        self
    }

    pub fn contains(mut self, field: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.clauses.push(Clause::Contains(field.into(), fragment.into()));
        self
    }

    pub fn any_of(mut self, clauses: Vec<Clause>) -> Self {
        self.clauses.push(Clause::AnyOf(clauses));
        self
    }

    pub fn matches<T: Document>(&self, doc: &T) -> bool {
        self.clauses.iter().all(|c| c.matches(doc))
    }
}
