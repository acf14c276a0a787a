//! Path validation for file operations.
//!
//! Canonicalizes a requested path (resolving symlinks and `..`) and checks
//! the result against the permitted root and the configured forbidden
//! paths and directory names. Containment is checked on the *canonical*
//! path, so `../` chains, mixed separators, absolute substitution, and
//! symlinks cannot escape the root.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::SecurityConfig;

/// What the caller intends to do with the path. The checks are identical
/// for all operations; the operation is carried for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    List,
}

impl FileOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOperation::Read => "read",
            FileOperation::Write => "write",
            FileOperation::List => "list",
        }
    }
}

/// Verdict for a single path validation. Produced fresh per call.
///
/// When `is_valid` is true, `resolved` holds the canonical absolute path
/// under the permitted root. On rejection, `reasons` lists every failed
/// check in order.
#[derive(Debug, Clone)]
pub struct PathValidation {
    pub is_valid: bool,
    pub reasons: Vec<String>,
    pub resolved: Option<PathBuf>,
}

impl PathValidation {
    fn valid(resolved: PathBuf) -> Self {
        Self {
            is_valid: true,
            reasons: Vec::new(),
            resolved: Some(resolved),
        }
    }

    fn rejected(reasons: Vec<String>, resolved: Option<PathBuf>) -> Self {
        Self {
            is_valid: false,
            reasons,
            resolved,
        }
    }
}

/// Validates paths against a permitted root and an immutable policy.
///
/// Pure over its inputs and the filesystem: no internal state, freely
/// shared across concurrent callers.
#[derive(Debug, Clone)]
pub struct PathValidator {
    root: PathBuf,
    config: Arc<SecurityConfig>,
}

impl PathValidator {
    pub fn new(root: impl Into<PathBuf>, config: Arc<SecurityConfig>) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// The configured (un-canonicalized) permitted root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a raw path for the given operation.
    ///
    /// Never panics: canonicalization failures become rejection reasons.
    pub fn validate(&self, raw: &str, operation: FileOperation) -> PathValidation {
        let canonical_root = match self.root.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                return PathValidation::rejected(
                    vec![format!("cannot resolve permitted root: {}", e)],
                    None,
                );
            }
        };

        let requested = PathBuf::from(raw);
        let joined = if requested.is_absolute() {
            requested
        } else {
            canonical_root.join(requested)
        };
        let resolved = canonicalize_lenient(&joined);

        if !resolved.starts_with(&canonical_root) {
            tracing::warn!(
                path = raw,
                operation = operation.as_str(),
                "path rejected: outside allowed directory"
            );
            return PathValidation::rejected(
                vec![format!(
                    "outside allowed directory: {}",
                    canonical_root.display()
                )],
                Some(resolved),
            );
        }

        let mut reasons = Vec::new();
        let resolved_str = resolved.to_string_lossy();
        for needle in &self.config.forbidden_paths {
            if resolved_str.contains(needle.as_str()) {
                reasons.push(format!("forbidden path: {}", needle));
            }
        }
        for dir in &self.config.forbidden_dirs {
            let hit = resolved
                .components()
                .any(|c| matches!(c, Component::Normal(name) if name == dir.as_str()));
            if hit {
                reasons.push(format!("forbidden directory: {}", dir));
            }
        }

        if reasons.is_empty() {
            tracing::debug!(
                path = %resolved.display(),
                operation = operation.as_str(),
                "path allowed"
            );
            PathValidation::valid(resolved)
        } else {
            tracing::warn!(
                path = %resolved.display(),
                operation = operation.as_str(),
                reasons = ?reasons,
                "path rejected"
            );
            PathValidation::rejected(reasons, Some(resolved))
        }
    }
}

/// Canonicalize a path that may not exist yet.
///
/// `std::fs::canonicalize` fails on non-existent paths, so for new files
/// (writes) we normalize lexically, canonicalize the nearest existing
/// ancestor, and re-append the remaining tail. Symlinks in the existing
/// portion are resolved before the containment check.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let normalized = normalize_lexical(path);
    let mut ancestor = normalized.as_path();
    let mut tail: Vec<&std::ffi::OsStr> = Vec::new();
    loop {
        if ancestor.exists() {
            let mut result = ancestor
                .canonicalize()
                .unwrap_or_else(|_| ancestor.to_path_buf());
            for part in tail.into_iter().rev() {
                result.push(part);
            }
            return result;
        }
        match (ancestor.file_name(), ancestor.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name);
                ancestor = parent;
            }
            _ => return normalized,
        }
    }
}

/// Resolve `.` and `..` components lexically, without filesystem access.
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if components
                    .last()
                    .is_some_and(|c| matches!(c, Component::Normal(_)))
                {
                    components.pop();
                }
            }
            Component::CurDir => {}
            other => components.push(other),
        }
    }
    components.iter().collect()
}
