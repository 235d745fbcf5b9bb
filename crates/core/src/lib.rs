//! `stockroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod actor;
pub mod error;
pub mod id;
pub mod stamp;

pub use actor::Actor;
pub use error::{DomainError, DomainResult, ValidationErrors};
pub use id::DocId;
pub use stamp::AuditStamp;
