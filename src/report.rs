//! Structured error reporting.
//!
//! Normalizes failures into a uniform shape for callers and logs. Created
//! at the point of failure and immutable afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::GateError;

/// Uniform error shape surfaced to tool-host callers.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredError {
    pub error_code: String,
    pub message: String,
    pub retryable: bool,
    /// RFC 3339 timestamp of when the failure was observed.
    pub timestamp: DateTime<Utc>,
}

impl StructuredError {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            retryable,
            timestamp: Utc::now(),
        }
    }

    /// Build from a gateway error, taking code and retryability from the
    /// taxonomy.
    pub fn from_error(err: &GateError) -> Self {
        Self::new(err.error_code(), err.to_string(), err.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_policy_rejection() {
        let err = GateError::CommandRejected {
            command: "rm -rf /".to_string(),
            reason: "dangerous pattern: recursive force delete".to_string(),
        };
        let report = StructuredError::from_error(&err);
        assert_eq!(report.error_code, "command_rejected");
        assert!(!report.retryable);
        assert!(report.message.contains("recursive force delete"));
    }

    #[test]
    fn test_from_rate_limited() {
        let err = GateError::RateLimited {
            channel: "outbound".to_string(),
            retry_after: Duration::from_secs(3),
        };
        let report = StructuredError::from_error(&err);
        assert_eq!(report.error_code, "rate_limited");
        assert!(report.retryable);
    }

    #[test]
    fn test_serializes_with_rfc3339_timestamp() {
        let report = StructuredError::new("io", "parent vanished", true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error_code"], "io");
        assert_eq!(json["retryable"], true);
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
