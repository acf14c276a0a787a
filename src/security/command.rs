//! Shell command validation.
//!
//! Deny-first: the whole raw command is matched against the dangerous
//! pattern set before any tokenization, so an allowlisted prefix cannot
//! shield a dangerous suffix. Only then is the first token checked against
//! the allowlist.
//!
//! This is a coarse filter, not a shell parser: quoting, subshells, and
//! variable expansion are not interpreted, and command separators are only
//! caught when the text after them matches a dangerous pattern. Handlers
//! that need stricter guarantees must not pass attacker-controlled suffixes.

use std::path::Path;
use std::sync::Arc;

use crate::config::SecurityConfig;

/// Verdict for a single command validation.
///
/// On acceptance, `program` holds the base executable name. On rejection,
/// `reason` names the dangerous pattern or the allowlist miss.
#[derive(Debug, Clone)]
pub struct CommandValidation {
    pub is_valid: bool,
    pub reason: Option<String>,
    pub program: Option<String>,
}

impl CommandValidation {
    fn accepted(program: String) -> Self {
        Self {
            is_valid: true,
            reason: None,
            program: Some(program),
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason),
            program: None,
        }
    }
}

/// Validates shell commands against an immutable policy.
///
/// Stateless; freely shared across concurrent callers.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    config: Arc<SecurityConfig>,
}

impl CommandValidator {
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        Self { config }
    }

    /// Validate a raw command string.
    pub fn validate(&self, raw: &str) -> CommandValidation {
        let lowered = raw.to_lowercase();
        for pattern in &self.config.dangerous_patterns {
            if pattern.matches(&lowered) {
                tracing::warn!(
                    command = raw,
                    pattern = pattern.description(),
                    "command rejected: dangerous pattern"
                );
                return CommandValidation::rejected(format!(
                    "dangerous pattern: {}",
                    pattern.description()
                ));
            }
        }

        let Some(first) = raw.trim().split_whitespace().next() else {
            return CommandValidation::rejected("empty command".to_string());
        };

        let base = Path::new(first)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| first.to_string());

        let allowed = self
            .config
            .allowed_commands
            .iter()
            .any(|entry| entry == first || *entry == base);

        if allowed {
            tracing::debug!(command = raw, program = %base, "command allowed");
            CommandValidation::accepted(base)
        } else {
            tracing::warn!(command = raw, program = %base, "command rejected: not in allowlist");
            CommandValidation::rejected(format!("not in allowlist: {}", base))
        }
    }
}
