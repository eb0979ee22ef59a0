//! Allow-list entry type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One allow-list record as stored in the remote document.
///
/// The expiry date travels on the wire as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use warden_core::Entry;
///
/// let expiry = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let entry = Entry::new("abc123", expiry, "test");
///
/// assert_eq!(entry.uid, "abc123");
/// assert!(entry.matches_uid("  abc123 "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, non-empty after trimming
    pub uid: String,
    /// Last day the identifier is allowed
    pub expiry_date: NaiveDate,
    /// Free-form note
    pub comment: String,
}

impl Entry {
    /// Create a new entry.
    pub fn new(uid: impl Into<String>, expiry_date: NaiveDate, comment: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            expiry_date,
            comment: comment.into(),
        }
    }

    /// Whether this entry's uid equals `uid`, ignoring surrounding whitespace on both sides.
    pub fn matches_uid(&self, uid: &str) -> bool {
        self.uid.trim() == uid.trim()
    }
}
