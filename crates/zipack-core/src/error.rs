//! Error types for the packaging pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while loading configuration, collecting files,
/// or writing the archive.
#[derive(Error, Debug)]
pub enum PackError {
    /// Configuration file does not exist at the given path.
    #[error("config file not found: {path}")]
    ConfigNotFound {
        /// The path that was probed.
        path: PathBuf,
    },

    /// Configuration document is not valid JSON.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration is structurally valid but semantically unusable.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// Archive mode string is neither `overwrite` nor `update`.
    #[error("unsupported archive mode: {mode:?} (expected \"overwrite\" or \"update\")")]
    UnsupportedMode {
        /// The mode string that was rejected.
        mode: String,
    },

    /// Collection produced no files and empty-directory preservation is off.
    #[error("no files collected: targets matched nothing, or everything was excluded")]
    NoFilesCollected,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip library failed while writing or merging the archive.
    #[error("archive write failed: {0}")]
    ArchiveWrite(#[from] zip::result::ZipError),
}

impl PackError {
    /// Returns `true` if this error originates from the configuration
    /// document rather than from collection or archive I/O.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParse(_)
                | Self::ConfigInvalid { .. }
                | Self::UnsupportedMode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackError::NoFilesCollected;
        assert!(err.to_string().contains("no files collected"));
    }

    #[test]
    fn test_config_not_found_display() {
        let err = PackError::ConfigNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_unsupported_mode_display() {
        let err = PackError::UnsupportedMode {
            mode: "append".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("append"));
        assert!(msg.contains("overwrite"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PackError = io_err.into();
        assert!(matches!(err, PackError::Io(_)));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_is_config_error() {
        let err = PackError::ConfigInvalid {
            reason: "targets must not be empty".to_string(),
        };
        assert!(err.is_config_error());

        let err = PackError::UnsupportedMode {
            mode: "merge".to_string(),
        };
        assert!(err.is_config_error());

        assert!(!PackError::NoFilesCollected.is_config_error());
    }
}
