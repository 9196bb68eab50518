//! Target resolution and file collection.
//!
//! Every resolution happens against an explicit root directory; the
//! process working directory is never consulted, so collection is safe
//! to run concurrently from multiple configurations in one process.

use crate::error::PackError;
use crate::error::Result;
use crate::exclude::ExclusionMatcher;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Result of resolving the configured targets.
///
/// `files` is ordered (first-seen) and deduplicated; `dirs` is the set of
/// directories to preserve when empty-directory handling is active. All
/// paths are relative to the collection root and none of them matches an
/// exclusion pattern.
#[derive(Debug, Default)]
pub struct ResolvedPathSet {
    /// Relative file paths in first-seen order, no duplicates.
    pub files: Vec<PathBuf>,
    /// Relative directory paths.
    pub dirs: BTreeSet<PathBuf>,
    /// Human-readable notes for targets that were skipped.
    pub warnings: Vec<String>,
}

impl ResolvedPathSet {
    fn push_file(&mut self, seen: &mut HashSet<PathBuf>, rel: PathBuf) {
        if seen.insert(rel.clone()) {
            self.files.push(rel);
        }
    }
}

/// Resolves `targets` against `root` into a deduplicated path set.
///
/// Targets may be absolute or root-relative. A missing target, or an
/// absolute target that does not resolve under `root`, is skipped with a
/// warning; collection continues. A target whose own relative path is
/// excluded is skipped wholesale, and an excluded directory prunes its
/// entire subtree.
///
/// # Errors
///
/// - [`PackError::NoFilesCollected`] when no file survives and
///   `include_empty_dirs` is off
/// - [`PackError::Io`] when directory traversal fails
pub fn collect(
    root: &Path,
    targets: &[String],
    matcher: &ExclusionMatcher,
    include_empty_dirs: bool,
) -> Result<ResolvedPathSet> {
    let mut set = ResolvedPathSet::default();
    let mut seen = HashSet::new();

    for raw in targets {
        let raw_path = Path::new(raw);
        let abs = if raw_path.is_absolute() {
            raw_path.to_path_buf()
        } else {
            root.join(raw_path)
        };

        if !abs.exists() {
            set.warnings.push(format!("target not found, skipped: {raw}"));
            continue;
        }
        // Canonicalize so `..` segments and symlinked prefixes compare
        // cleanly against the canonical root.
        let abs = match abs.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                set.warnings
                    .push(format!("target not resolvable, skipped: {raw} ({e})"));
                continue;
            }
        };
        let rel = match abs.strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => {
                set.warnings
                    .push(format!("target outside root_dir, skipped: {raw}"));
                continue;
            }
        };

        if !rel.as_os_str().is_empty() && matcher.matches(&rel) {
            continue;
        }

        if abs.is_dir() {
            if !rel.as_os_str().is_empty() {
                set.dirs.insert(rel);
            }
            walk_directory(root, &abs, matcher, include_empty_dirs, &mut set, &mut seen)?;
        } else {
            set.push_file(&mut seen, rel);
        }
    }

    if set.files.is_empty() && !include_empty_dirs {
        return Err(PackError::NoFilesCollected);
    }

    Ok(set)
}

/// Walks a target directory, pruning excluded branches.
fn walk_directory(
    root: &Path,
    dir: &Path,
    matcher: &ExclusionMatcher,
    include_empty_dirs: bool,
    set: &mut ResolvedPathSet,
    seen: &mut HashSet<PathBuf>,
) -> Result<()> {
    // Sorted traversal keeps first-seen file order stable across
    // platforms and runs.
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Excluded directories drop with their whole subtree;
            // children are never reconsidered once the parent matches.
            entry.depth() == 0
                || entry
                    .path()
                    .strip_prefix(root)
                    .is_ok_and(|rel| !matcher.matches(rel))
        });

    for entry in walker {
        let entry = entry
            .map_err(|e| PackError::Io(std::io::Error::other(format!("walkdir error: {e}"))))?;
        if entry.depth() == 0 {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = rel.to_path_buf();

        let path = entry.path();
        if path.is_dir() {
            if include_empty_dirs {
                set.dirs.insert(rel);
            }
        } else if path.is_file() {
            set.push_file(seen, rel);
        }
    }

    Ok(())
}
