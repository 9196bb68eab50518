//! Glob-based exclusion matching for collected paths.
//!
//! Patterns and candidate paths are both normalized (lowercased, `\`
//! folded to `/`) before comparison, so matching is case-insensitive and
//! separator-agnostic. A pattern matches when it covers the whole
//! relative path or any single path component, which lets a bare name
//! like `__pycache__` exclude a directory anywhere in the tree.

use crate::error::PackError;
use crate::error::Result;
use glob::MatchOptions;
use glob::Pattern;
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// An ordered set of compiled exclusion patterns.
///
/// Evaluation is stateless logical OR: a path is excluded when any
/// pattern matches. First match short-circuits but the result does not
/// depend on pattern order.
///
/// # Examples
///
/// ```
/// use zipack_core::ExclusionMatcher;
/// use std::path::Path;
///
/// let matcher = ExclusionMatcher::compile(&["*.pyc".to_string()]).unwrap();
/// assert!(matcher.matches(Path::new("build/x.pyc")));
/// assert!(!matcher.matches(Path::new("build/x.py")));
/// ```
#[derive(Debug)]
pub struct ExclusionMatcher {
    patterns: Vec<Pattern>,
}

impl ExclusionMatcher {
    /// Compiles the given glob patterns. Empty pattern strings are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ConfigInvalid`] for a malformed glob.
    pub fn compile(globs: &[String]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(globs.len());
        for raw in globs {
            if raw.trim().is_empty() {
                continue;
            }
            let normalized = normalize(raw);
            let pattern = Pattern::new(&normalized).map_err(|e| PackError::ConfigInvalid {
                reason: format!("invalid exclude pattern {raw:?}: {e}"),
            })?;
            patterns.push(pattern);
        }
        Ok(Self { patterns })
    }

    /// Returns `true` when `path` is excluded by any pattern.
    ///
    /// `path` is expected to be relative; each pattern is tried against
    /// the full normalized path and against every individual component.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let full = normalize(&path.to_string_lossy());
        if full.is_empty() {
            return false;
        }
        self.patterns.iter().any(|pattern| {
            if pattern.matches_with(&full, MATCH_OPTIONS) {
                return true;
            }
            full.split('/')
                .any(|component| pattern.matches_with(component, MATCH_OPTIONS))
        })
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns were compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Folds backslashes to forward slashes and lowercases.
fn normalize(s: &str) -> String {
    s.replace('\\', "/").to_lowercase()
}
