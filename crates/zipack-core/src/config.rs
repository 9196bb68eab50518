//! Configuration document loading and validation.

use crate::error::PackError;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

/// Conventional config filename looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "zipack.json";

/// Archive filename used when the config does not name one.
pub const DEFAULT_ZIP_NAME: &str = "archive.zip";

/// How an existing archive at the destination is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveMode {
    /// Delete any existing archive and write a fresh one.
    #[default]
    Overwrite,
    /// Merge into an existing archive; entries with matching paths are
    /// replaced, new entries are added. Falls back to a fresh write when
    /// the destination does not exist.
    Update,
}

impl FromStr for ArchiveMode {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overwrite" => Ok(Self::Overwrite),
            "update" => Ok(Self::Update),
            other => Err(PackError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ArchiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Shape of the JSON configuration document before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    root_dir: String,
    #[serde(default)]
    output_dir: Option<String>,
    #[serde(default)]
    zip_name: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    wrap_folder_name: Option<String>,
    #[serde(default)]
    include_empty_dirs: bool,
    #[serde(default)]
    exclude_globs: Vec<String>,
}

/// Validated packaging configuration.
///
/// Built either from a JSON document via [`ArchiveConfig::load`] or
/// programmatically via [`ArchiveConfig::new`] plus the `with_*` builders.
///
/// # Examples
///
/// ```no_run
/// use zipack_core::ArchiveConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::load("zipack.json")?;
/// println!("packing into {}", config.archive_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Base directory every target and relative path resolves against.
    pub root_dir: PathBuf,
    /// Directory the archive is written to. Resolved against `root_dir`
    /// when the configured value is relative.
    pub output_dir: PathBuf,
    /// Filename of the archive inside `output_dir`.
    pub zip_name: String,
    /// Overwrite or update semantics for an existing archive.
    pub mode: ArchiveMode,
    /// Ordered file or directory paths to collect, absolute or
    /// root-relative.
    pub targets: Vec<String>,
    /// Synthetic top-level folder every archive entry is nested under.
    pub wrap_folder_name: Option<String>,
    /// Preserve directories that contain no files as directory entries.
    pub include_empty_dirs: bool,
    /// Glob patterns; any match excludes the path from collection.
    pub exclude_globs: Vec<String>,
}

impl ArchiveConfig {
    /// Creates a configuration with defaults for every optional field.
    ///
    /// The root directory is not validated here; validation happens in
    /// [`ArchiveConfig::load`] for document-driven configs and in the
    /// collector for programmatic ones.
    #[must_use]
    pub fn new<P: AsRef<Path>>(root_dir: P, targets: Vec<String>) -> Self {
        let root = root_dir.as_ref().to_path_buf();
        Self {
            output_dir: root.clone(),
            root_dir: root,
            zip_name: DEFAULT_ZIP_NAME.to_string(),
            mode: ArchiveMode::default(),
            targets,
            wrap_folder_name: None,
            include_empty_dirs: false,
            exclude_globs: Vec::new(),
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Sets the archive filename.
    #[must_use]
    pub fn with_zip_name<S: Into<String>>(mut self, name: S) -> Self {
        self.zip_name = name.into();
        self
    }

    /// Sets the archive mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ArchiveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the wrap folder name.
    #[must_use]
    pub fn with_wrap_folder<S: Into<String>>(mut self, name: S) -> Self {
        self.wrap_folder_name = Some(name.into());
        self
    }

    /// Sets whether empty directories are preserved.
    #[must_use]
    pub fn with_include_empty_dirs(mut self, include: bool) -> Self {
        self.include_empty_dirs = include;
        self
    }

    /// Sets the exclusion patterns.
    #[must_use]
    pub fn with_exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    /// Loads and validates a configuration document.
    ///
    /// # Errors
    ///
    /// - [`PackError::ConfigNotFound`] when `path` does not exist
    /// - [`PackError::ConfigParse`] on malformed JSON
    /// - [`PackError::ConfigInvalid`] when `root_dir` is blank, missing
    ///   from disk, or not a directory, or when `targets` is empty
    /// - [`PackError::UnsupportedMode`] for an unrecognized mode string
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PackError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        let raw: RawConfig = serde_json::from_str(&text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        if raw.root_dir.trim().is_empty() {
            return Err(PackError::ConfigInvalid {
                reason: "root_dir is required".to_string(),
            });
        }
        let root = PathBuf::from(&raw.root_dir);
        if !root.is_dir() {
            return Err(PackError::ConfigInvalid {
                reason: format!("root_dir is not an existing directory: {}", root.display()),
            });
        }
        // Canonical root keeps strip_prefix well-defined for absolute
        // targets even when the configured path goes through symlinks.
        let root = root.canonicalize().map_err(|e| PackError::ConfigInvalid {
            reason: format!("cannot resolve root_dir {}: {e}", root.display()),
        })?;

        if raw.targets.is_empty() {
            return Err(PackError::ConfigInvalid {
                reason: "targets must not be empty".to_string(),
            });
        }

        let mode = match raw.mode.as_deref() {
            None => ArchiveMode::default(),
            Some(s) => ArchiveMode::from_str(s)?,
        };

        let output_dir = raw.output_dir.map_or_else(
            || root.clone(),
            |dir| {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() { dir } else { root.join(dir) }
            },
        );

        let wrap_folder_name = raw
            .wrap_folder_name
            .filter(|name| !name.trim().is_empty());

        Ok(Self {
            root_dir: root,
            output_dir,
            zip_name: raw
                .zip_name
                .unwrap_or_else(|| DEFAULT_ZIP_NAME.to_string()),
            mode,
            targets: raw.targets,
            wrap_folder_name,
            include_empty_dirs: raw.include_empty_dirs,
            exclude_globs: raw.exclude_globs,
        })
    }

    /// Full path of the archive this configuration produces.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.zip_name)
    }

    /// Whether the pipeline needs a staged mirror before archiving.
    #[must_use]
    pub fn needs_staging(&self) -> bool {
        self.include_empty_dirs || self.wrap_folder_name.is_some()
    }
}
