//! Audit stamping: author/timestamp provenance attached on every write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance metadata carried by every persisted document.
///
/// `origin` records which layer performed the write (managers stamp with
/// `"manager"`), so imported or migrated records are distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub origin: String,
}

impl AuditStamp {
    /// Stamp a write: the first stamp fills the created fields, every stamp
    /// refreshes the updated fields.
    pub fn stamp(&mut self, user: &str, origin: &str) {
        let now = Utc::now();
        if self.created_at.is_none() {
            self.created_by = user.to_string();
            self.created_at = Some(now);
        }
        self.updated_by = user.to_string();
        self.updated_at = Some(now);
        self.origin = origin.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_stamp_sets_created_and_updated() {
        let mut stamp = AuditStamp::default();
        stamp.stamp("unit-test", "manager");
        assert_eq!(stamp.created_by, "unit-test");
        assert_eq!(stamp.updated_by, "unit-test");
        assert_eq!(stamp.origin, "manager");
        assert!(stamp.created_at.is_some());
        assert_eq!(stamp.created_at, stamp.updated_at);
    }

    #[test]
    fn restamp_preserves_created_fields() {
        let mut stamp = AuditStamp::default();
        stamp.stamp("alice", "manager");
        let created = stamp.created_at;
        stamp.stamp("bob", "manager");
        assert_eq!(stamp.created_by, "alice");
        assert_eq!(stamp.created_at, created);
        assert_eq!(stamp.updated_by, "bob");
    }
}
