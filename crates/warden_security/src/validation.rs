//! Input validation for allow-list entries.

use crate::{SecurityError, SecurityErrorKind, SecurityResult};
use chrono::{Datelike, NaiveDate};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Limits applied to user-supplied entry fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ValidationPolicy {
    /// Earliest accepted expiry year (inclusive)
    #[serde(default = "default_min_year")]
    min_year: i32,
    /// Latest accepted expiry year (inclusive)
    #[serde(default = "default_max_year")]
    max_year: i32,
    /// Maximum uid length in characters, after trimming
    #[serde(default = "default_max_uid_len")]
    max_uid_len: usize,
    /// Maximum comment length in characters
    #[serde(default = "default_max_comment_len")]
    max_comment_len: usize,
}

fn default_min_year() -> i32 {
    2000
}

fn default_max_year() -> i32 {
    2100
}

fn default_max_uid_len() -> usize {
    64
}

fn default_max_comment_len() -> usize {
    500
}

impl ValidationPolicy {
    /// Create a policy accepting expiry years in `min_year..=max_year`.
    pub fn with_year_range(min_year: i32, max_year: i32) -> Self {
        Self {
            min_year,
            max_year,
            ..Self::default()
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
            max_year: default_max_year(),
            max_uid_len: default_max_uid_len(),
            max_comment_len: default_max_comment_len(),
        }
    }
}

/// Validates the fields of an add-or-update request.
#[derive(Debug, Clone, Default)]
pub struct EntryValidator {
    policy: ValidationPolicy,
}

#[track_caller]
fn invalid(field: &str, reason: impl Into<String>) -> SecurityError {
    SecurityError::new(SecurityErrorKind::ValidationFailed {
        field: field.to_string(),
        reason: reason.into(),
    })
}

impl EntryValidator {
    /// Create a validator enforcing `policy`.
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Trim a uid and check it is usable as a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_security::EntryValidator;
    ///
    /// let validator = EntryValidator::default();
    /// assert_eq!(validator.uid("  abc123 ").unwrap(), "abc123");
    /// assert!(validator.uid("   ").is_err());
    /// ```
    pub fn uid(&self, raw: &str) -> SecurityResult<String> {
        let uid = raw.trim();
        if uid.is_empty() {
            return Err(invalid("uid", "must not be empty"));
        }
        if uid.chars().count() > self.policy.max_uid_len {
            return Err(invalid(
                "uid",
                format!("must be at most {} characters", self.policy.max_uid_len),
            ));
        }
        if uid.chars().any(char::is_control) {
            return Err(invalid("uid", "must not contain control characters"));
        }
        Ok(uid.to_string())
    }

    /// Assemble and check an expiry date from its parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_security::EntryValidator;
    ///
    /// let validator = EntryValidator::default();
    /// assert_eq!(validator.expiry_date(2025, 1, 1).unwrap().to_string(), "2025-01-01");
    /// assert!(validator.expiry_date(2025, 2, 30).is_err());
    /// assert!(validator.expiry_date(1999, 12, 31).is_err());
    /// ```
    #[instrument(skip(self))]
    pub fn expiry_date(&self, year: i64, month: i64, day: i64) -> SecurityResult<NaiveDate> {
        let year = i32::try_from(year)
            .ok()
            .filter(|y| (self.policy.min_year..=self.policy.max_year).contains(y))
            .ok_or_else(|| {
                debug!("Year outside accepted range");
                invalid(
                    "year",
                    format!(
                        "must be between {} and {}",
                        self.policy.min_year, self.policy.max_year
                    ),
                )
            })?;

        let month = u32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| invalid("month", "must be between 1 and 12"))?;
        let day = u32::try_from(day)
            .ok()
            .filter(|d| (1..=31).contains(d))
            .ok_or_else(|| invalid("day", "must be between 1 and 31"))?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            invalid(
                "expiry date",
                format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
            )
        })
    }

    /// Check that an already-parsed expiry date falls inside the accepted years.
    pub fn expiry(&self, date: NaiveDate) -> SecurityResult<NaiveDate> {
        let year = date.year();
        if year < self.policy.min_year || year > self.policy.max_year {
            return Err(invalid(
                "year",
                format!(
                    "must be between {} and {}",
                    self.policy.min_year, self.policy.max_year
                ),
            ));
        }
        Ok(date)
    }

    /// Check a comment's length.
    pub fn comment(&self, raw: &str) -> SecurityResult<String> {
        if raw.chars().count() > self.policy.max_comment_len {
            return Err(invalid(
                "comment",
                format!("must be at most {} characters", self.policy.max_comment_len),
            ));
        }
        Ok(raw.to_string())
    }

    /// Get the validation policy.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }
}
