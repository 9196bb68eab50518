//! Temporary staging of the archive layout.
//!
//! Staging materializes an on-disk mirror of the desired archive tree
//! when the final layout differs from the raw collected paths: a wrap
//! folder nests every entry, and empty-directory preservation needs real
//! directory entries to exist before compression.

use crate::collect::ResolvedPathSet;
use crate::error::Result;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

/// Folder name used for the staged content when no wrap name is set.
const DEFAULT_STAGE_FOLDER: &str = "bundle";

/// A staged mirror of the collected path set.
///
/// The mirror lives in a uniquely named temporary directory containing a
/// single top-level folder. Dropping the value removes the whole tree;
/// removal errors are swallowed, so cleanup is best-effort on every exit
/// path including panics and early returns.
#[derive(Debug)]
pub struct StagingTree {
    tmp: TempDir,
    content_dir: PathBuf,
    wrapped: bool,
}

impl StagingTree {
    /// Builds the staged tree for `set` under a fresh temporary root.
    ///
    /// One top-level folder is created inside the temporary root, named
    /// `wrap_name` when given and a fixed placeholder otherwise. Every
    /// directory in the set is recreated beneath it (so empty directories
    /// survive), then every file is copied to its mirrored location.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackError::Io`] when the temporary directory
    /// cannot be created or a copy fails.
    pub fn materialize(
        root: &Path,
        set: &ResolvedPathSet,
        wrap_name: Option<&str>,
    ) -> Result<Self> {
        let tmp = tempfile::Builder::new().prefix("zipack-").tempdir()?;
        let folder = wrap_name.unwrap_or(DEFAULT_STAGE_FOLDER);
        let content_dir = tmp.path().join(folder);
        fs::create_dir(&content_dir)?;

        for dir in &set.dirs {
            fs::create_dir_all(content_dir.join(dir))?;
        }
        for file in &set.files {
            let dest = content_dir.join(file);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(root.join(file), &dest)?;
        }

        Ok(Self {
            tmp,
            content_dir,
            wrapped: wrap_name.is_some(),
        })
    }

    /// The temporary root holding the staged folder.
    #[must_use]
    pub fn stage_root(&self) -> &Path {
        self.tmp.path()
    }

    /// The staged top-level folder; the archive builder's input root.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// The wrap prefix archive entries must carry, if wrapping was
    /// requested explicitly.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        if self.wrapped {
            self.content_dir.file_name().and_then(|n| n.to_str())
        } else {
            None
        }
    }
}
