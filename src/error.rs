//! Error types for the gateway core.
//!
//! Expected rejections (policy denials, rate-limit refusals) are normal
//! return values, not panics. Only `Io` represents a transient fault.

use std::time::Duration;

/// Top-level error type for the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Path {path} rejected: {}", .reasons.join("; "))]
    PathRejected { path: String, reasons: Vec<String> },

    #[error("Command rejected: {reason}")]
    CommandRejected { command: String, reason: String },

    #[error("Rate limited on channel {channel}, retry after {retry_after:?}")]
    RateLimited {
        channel: String,
        retry_after: Duration,
    },

    #[error("Unknown rate-limit channel: {0}")]
    UnknownChannel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    /// Stable machine-readable code for this error, used by callers and
    /// by [`crate::report::StructuredError`].
    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::PathRejected { .. } => "path_rejected",
            GateError::CommandRejected { .. } => "command_rejected",
            GateError::RateLimited { .. } => "rate_limited",
            GateError::UnknownChannel(_) => "unknown_channel",
            GateError::Io(_) => "io",
        }
    }

    /// Whether a caller may retry after this error. Policy rejections are
    /// final; rate-limit refusals and transient IO faults are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GateError::RateLimited { .. } | GateError::Io(_))
    }
}

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = GateError::PathRejected {
            path: "/etc/passwd".to_string(),
            reasons: vec!["outside allowed directory".to_string()],
        };
        assert_eq!(err.error_code(), "path_rejected");
        assert!(!err.is_retryable());

        let err = GateError::CommandRejected {
            command: "rm -rf /".to_string(),
            reason: "dangerous pattern".to_string(),
        };
        assert_eq!(err.error_code(), "command_rejected");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        let err = GateError::RateLimited {
            channel: "outbound".to_string(),
            retry_after: Duration::from_millis(250),
        };
        assert_eq!(err.error_code(), "rate_limited");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_io_is_retryable() {
        let err = GateError::Io(std::io::Error::other("parent vanished"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_path_rejected_display_joins_reasons() {
        let err = GateError::PathRejected {
            path: "/x".to_string(),
            reasons: vec![
                "forbidden path: /etc".to_string(),
                "forbidden directory: .ssh".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("forbidden path: /etc; forbidden directory: .ssh"));
    }
}
