//! Domain error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Structured field-path error map produced by manager validation.
///
/// Serializes to the contract shape consumers expect: each invalid field is a
/// key with a message, and list-valued fields carry a sparse `items` array
/// with one entry per list position (empty entries for valid positions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<ValidationErrors>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. Later writes to the same field win.
    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Attach the full per-item error array (sparse; keep empty entries so
    /// indices line up with the source list).
    pub fn set_items(&mut self, items: Vec<ValidationErrors>) {
        self.items = Some(items);
    }

    pub fn items(&self) -> Option<&[ValidationErrors]> {
        self.items.as_deref()
    }

    pub fn item(&self, index: usize) -> Option<&ValidationErrors> {
        self.items.as_ref()?.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.items.is_none()
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation, missing
/// records). Backend failures are surfaced with their message preserved and
/// are never retried here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed manager validation; the structured map is surfaced to the
    /// caller verbatim.
    #[error("{message}")]
    Validation {
        message: String,
        errors: ValidationErrors,
    },

    /// A strict fetch did not match any record.
    #[error("not found")]
    NotFound,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A storage backend failure, surfaced unmodified.
    #[error("storage backend: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation {
            message: "data does not pass validation".to_string(),
            errors,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// The structured error map, when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
