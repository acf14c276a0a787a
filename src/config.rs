//! Configuration types.
//!
//! Both configs are built once at startup and immutable afterwards. They are
//! injected into the validators and the gateway rather than read from a
//! process-wide singleton, so tests can supply alternate policies.

use std::path::PathBuf;
use std::time::Duration;

use crate::security::patterns::{DangerousPattern, default_patterns};

/// Security policy: what commands may run and what paths may be touched.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Base executable names permitted to run (fail-closed allowlist).
    pub allowed_commands: Vec<String>,
    /// Substrings that must never appear in a resolved path.
    pub forbidden_paths: Vec<String>,
    /// Path-segment names rejected anywhere in a resolved path.
    pub forbidden_dirs: Vec<String>,
    /// Matchers run against the raw command string before tokenization.
    pub dangerous_patterns: Vec<DangerousPattern>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let allowed = [
            "ls", "cat", "echo", "grep", "rg", "find", "head", "tail", "wc", "pwd", "which",
            "env", "date", "sort", "uniq", "diff", "du", "df", "sed", "awk", "git", "cargo",
            "rustc", "python3", "node", "npm", "make",
        ];
        Self {
            allowed_commands: allowed.iter().map(|s| s.to_string()).collect(),
            forbidden_paths: [
                "/etc", "/sys", "/proc", "/boot", "/.ssh", "/.aws", "/.gnupg", "id_rsa",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            forbidden_dirs: [".git", ".ssh", ".aws", ".gnupg", "secrets"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dangerous_patterns: default_patterns(),
        }
    }
}

/// A named rate-limit channel.
#[derive(Debug, Clone)]
pub struct ChannelLimit {
    pub name: String,
    pub max_calls: usize,
    pub window: Duration,
}

impl ChannelLimit {
    pub fn new(name: impl Into<String>, max_calls: usize, window: Duration) -> Self {
        Self {
            name: name.into(),
            max_calls,
            window,
        }
    }
}

/// Gateway wiring: permitted root, limiter channels, cache TTL.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Root directory that file operations must stay within.
    pub root: PathBuf,
    /// Rate-limit channels, one limiter per entry.
    pub channels: Vec<ChannelLimit>,
    /// Default TTL for cached outbound-call results.
    pub default_cache_ttl: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            channels: vec![
                ChannelLimit::new("outbound", 10, Duration::from_secs(60)),
                ChannelLimit::new("docs", 10, Duration::from_secs(60)),
            ],
            default_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl GatewayConfig {
    /// Config rooted at the given directory, defaults otherwise.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}
