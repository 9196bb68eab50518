//! Error conversion utilities for CLI.
//!
//! Converts zipack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use zipack_core::PackError;

/// Converts `PackError` to a user-friendly anyhow error with context
pub fn convert_pack_error(err: PackError, config_path: &Path) -> anyhow::Error {
    match err {
        PackError::ConfigNotFound { path } => {
            anyhow!(
                "Config file not found: {}\n\
                 HINT: Pass a config path, or create '{}' next to where you run zipack.",
                path.display(),
                zipack_core::DEFAULT_CONFIG_FILE
            )
        }
        PackError::ConfigParse(parse_err) => {
            anyhow!(
                "Config file '{}' is not valid JSON: {parse_err}\n\
                 HINT: Check for trailing commas, unquoted keys, or comments.",
                config_path.display()
            )
        }
        PackError::ConfigInvalid { reason } => {
            anyhow!(
                "Config file '{}' is invalid: {reason}\n\
                 HINT: root_dir must be an existing directory and targets must list at least one path.",
                config_path.display()
            )
        }
        PackError::UnsupportedMode { mode } => {
            anyhow!(
                "Unsupported archive mode {mode:?} in '{}'\n\
                 HINT: mode must be \"overwrite\" or \"update\".",
                config_path.display()
            )
        }
        PackError::NoFilesCollected => {
            anyhow!(
                "No files collected: the targets matched nothing, or every match was excluded\n\
                 HINT: Check targets and exclude_globs, or set include_empty_dirs to archive directory markers only."
            )
        }
        PackError::Io(io_err) => {
            anyhow!("I/O error during packaging: {io_err}")
        }
        PackError::ArchiveWrite(zip_err) => {
            anyhow!("Failed to write archive: {zip_err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_convert_config_not_found() {
        let err = PackError::ConfigNotFound {
            path: PathBuf::from("missing.json"),
        };
        let converted = convert_pack_error(err, Path::new("missing.json"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("missing.json"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_unsupported_mode() {
        let err = PackError::UnsupportedMode {
            mode: "merge".to_string(),
        };
        let converted = convert_pack_error(err, Path::new("zipack.json"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("merge"));
        assert!(msg.contains("overwrite"));
    }

    #[test]
    fn test_convert_no_files_collected() {
        let converted = convert_pack_error(PackError::NoFilesCollected, Path::new("zipack.json"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("No files collected"));
        assert!(msg.contains("include_empty_dirs"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let converted = convert_pack_error(PackError::Io(io_err), Path::new("zipack.json"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
    }
}
