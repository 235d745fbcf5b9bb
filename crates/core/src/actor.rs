//! Acting-user identity injected into managers.

use serde::{Deserialize, Serialize};

/// The identity performing writes through a manager.
///
/// Managers receive an `Actor` at construction and stamp every persisted
/// document with its username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub username: String,
}

impl Actor {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
