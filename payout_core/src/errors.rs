//! # Error Types
//!
//! Structured error types for payout_core. Every failure is a deterministic
//! function of the caller's input and the loaded rate tables, so nothing
//! here is retryable.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::errors::{CalcError, CalcResult};
//!
//! fn validate_followers(followers: i64) -> CalcResult<u64> {
//!     if followers < 0 {
//!         return Err(CalcError::invalid_input(
//!             "followers",
//!             followers.to_string(),
//!             "Follower count cannot be negative",
//!         ));
//!     }
//!     Ok(followers as u64)
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for payout_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
///
/// Variants carry the offending field or table so a form handler can point
/// at the exact input that needs fixing.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value violates a documented domain constraint
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A rate table failed its invariants when it was loaded
    #[error("Invalid rate table '{table}': {reason}")]
    Configuration { table: String, reason: String },

    /// A categorical lookup found no entry (unvalidated tables only)
    #[error("No entry for '{key}' in rate table '{table}'")]
    UnknownEntry { table: String, key: String },

    /// TOML/JSON serialization or parsing error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Reading a rate table override file failed
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Configuration error
    pub fn configuration(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Configuration {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownEntry error
    pub fn unknown_entry(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::UnknownEntry {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::Serialization {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The input field this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Table errors mean the shipped data is broken and are fatal at startup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CalcError::Configuration { .. } | CalcError::UnknownEntry { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::Configuration { .. } => "CONFIGURATION_ERROR",
            CalcError::UnknownEntry { .. } => "UNKNOWN_ENTRY",
            CalcError::Serialization { .. } => "SERIALIZATION_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
        }
    }
}

/// Reject NaN, infinities and negatives for a real-valued input.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value cannot be negative",
        ));
    }
    Ok(value)
}

/// Like [`ensure_non_negative`] but also rejects values above 100.
pub(crate) fn ensure_percent(field: &str, value: f64) -> CalcResult<f64> {
    let value = ensure_non_negative(field, value)?;
    if value > 100.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Percentage cannot exceed 100",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("followers", "-5", "Follower count cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::configuration("follower_tiers", "gap").error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(CalcError::unknown_entry("niches", "fitness").error_code(), "UNKNOWN_ENTRY");
        assert!(CalcError::configuration("x", "y").is_configuration());
        assert!(!CalcError::invalid_input("x", "1", "bad").is_configuration());
    }

    #[test]
    fn test_field_accessor() {
        let error = CalcError::invalid_input("engagement_rate", "120", "too high");
        assert_eq!(error.field(), Some("engagement_rate"));
        assert_eq!(CalcError::serialization("oops").field(), None);
    }

    #[test]
    fn test_percent_guard() {
        assert!(ensure_percent("engagement_rate", 100.0).is_ok());
        assert!(ensure_percent("engagement_rate", 100.5).is_err());
        assert!(ensure_percent("engagement_rate", f64::NAN).is_err());
        assert!(ensure_non_negative("sales", -0.01).is_err());
    }
}
