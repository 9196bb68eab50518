//! ZIP archive construction and incremental update.
//!
//! Overwrite mode deletes any existing destination and writes fresh with
//! no atomic rename step, so a crash mid-write can leave no archive or a
//! truncated one. Update mode merges through a temporary file beside the
//! destination because the old archive must stay readable while the new
//! one is written.

use crate::config::ArchiveMode;
use crate::error::PackError;
use crate::error::Result;
use crate::report::PackReport;
use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// What the archive builder consumes.
#[derive(Debug)]
pub enum BuildInput<'a> {
    /// A staged directory tree; entries are walked from `dir`. With a
    /// `prefix`, every entry name (including the prefix directory entry
    /// itself) starts with `<prefix>/`.
    Staged {
        /// The staged content directory.
        dir: &'a Path,
        /// Wrap folder name prefixed onto every entry.
        prefix: Option<&'a str>,
    },
    /// Raw collected files archived directly against the root; entry
    /// names are the root-relative paths, no wrapping folder and no
    /// explicit directory entries.
    Files {
        /// Collection root the relative paths resolve against.
        root: &'a Path,
        /// Relative file paths to add.
        files: &'a [PathBuf],
    },
}

/// Creates or updates the archive at `dest`.
///
/// # Errors
///
/// Returns [`PackError::Io`] or [`PackError::ArchiveWrite`] when any
/// filesystem or zip operation fails; the run aborts on the first
/// failure with no retries.
pub fn write_archive(dest: &Path, mode: ArchiveMode, input: &BuildInput<'_>) -> Result<PackReport> {
    let start = std::time::Instant::now();

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut report = match mode {
        ArchiveMode::Update if dest.exists() => merge_into_existing(dest, input, &options)?,
        ArchiveMode::Overwrite | ArchiveMode::Update => {
            if dest.exists() {
                fs::remove_file(dest)?;
            }
            let mut report = PackReport::default();
            let file = File::create(dest)?;
            let mut zip = ZipWriter::new(file);
            add_input(&mut zip, input, &options, &mut report)?;
            zip.finish()?;
            report
        }
    };

    report.duration = start.elapsed();
    Ok(report)
}

/// Writes the new entries plus the retained old entries to a temporary
/// file, then renames it over the destination.
fn merge_into_existing(
    dest: &Path,
    input: &BuildInput<'_>,
    options: &SimpleFileOptions,
) -> Result<PackReport> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(parent)?;

    let mut report = PackReport::default();
    let mut zip = ZipWriter::new(tmp);
    let written = add_input(&mut zip, input, options, &mut report)?;

    let old = File::open(dest)?;
    let mut old_archive = ZipArchive::new(old)?;
    for index in 0..old_archive.len() {
        let entry = old_archive.by_index_raw(index)?;
        if written.contains(entry.name()) {
            report.entries_replaced += 1;
        } else {
            zip.raw_copy_file(entry)?;
            report.entries_carried += 1;
        }
    }

    let tmp = zip.finish()?;
    tmp.persist(dest).map_err(|e| PackError::Io(e.error))?;
    Ok(report)
}

/// Adds the input's entries to the writer and returns the entry names
/// that were written, as stored in the archive.
fn add_input<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    input: &BuildInput<'_>,
    options: &SimpleFileOptions,
    report: &mut PackReport,
) -> Result<HashSet<String>> {
    let mut names = HashSet::new();

    match input {
        BuildInput::Files { root, files } => {
            for rel in *files {
                let name = zip_entry_name(rel)?;
                add_file(zip, &root.join(rel), &name, options, report)?;
                names.insert(name);
            }
        }
        BuildInput::Staged { dir, prefix } => {
            let prefix = *prefix;
            for entry in WalkDir::new(dir).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    PackError::Io(std::io::Error::other(format!("walkdir error: {e}")))
                })?;

                if entry.depth() == 0 {
                    if let Some(p) = prefix {
                        let dir_name = format!("{p}/");
                        zip.add_directory(dir_name.as_str(), *options)?;
                        report.directories_added += 1;
                        names.insert(dir_name);
                    }
                    continue;
                }

                let rel = entry.path().strip_prefix(dir).map_err(|_| {
                    PackError::Io(std::io::Error::other(format!(
                        "staged entry escapes stage dir: {}",
                        entry.path().display()
                    )))
                })?;
                let base = zip_entry_name(rel)?;
                let name = prefix.map_or_else(|| base.clone(), |p| format!("{p}/{base}"));

                if entry.file_type().is_dir() {
                    let dir_name = format!("{name}/");
                    zip.add_directory(dir_name.as_str(), *options)?;
                    report.directories_added += 1;
                    names.insert(dir_name);
                } else if entry.file_type().is_file() {
                    add_file(zip, entry.path(), &name, options, report)?;
                    names.insert(name);
                }
            }
        }
    }

    Ok(names)
}

/// Streams one file into the archive under the given entry name.
fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    options: &SimpleFileOptions,
    report: &mut PackReport,
) -> Result<()> {
    let mut file = File::open(path)?;

    #[cfg(unix)]
    let file_options = {
        use std::os::unix::fs::PermissionsExt;
        let mode = file.metadata()?.permissions().mode();
        options.unix_permissions(mode)
    };
    #[cfg(not(unix))]
    let file_options = *options;

    zip.start_file(name, file_options)?;

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        zip.write_all(&buffer[..bytes_read])?;
        report.bytes_written += bytes_read as u64;
    }

    report.files_added += 1;
    Ok(())
}

/// Converts a relative path into a ZIP entry name (forward slashes).
fn zip_entry_name(path: &Path) -> Result<String> {
    let path_str = path.to_str().ok_or_else(|| {
        PackError::Io(std::io::Error::other(format!(
            "path is not valid UTF-8: {}",
            path.display()
        )))
    })?;

    #[cfg(windows)]
    let normalized = path_str.replace('\\', "/");

    #[cfg(not(windows))]
    let normalized = path_str.to_string();

    Ok(normalized)
}
