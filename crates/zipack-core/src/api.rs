//! High-level public API for the packaging pipeline.

use crate::archive::BuildInput;
use crate::archive::write_archive;
use crate::collect::collect;
use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::exclude::ExclusionMatcher;
use crate::report::PackReport;
use crate::stage::StagingTree;

/// Runs the full pipeline for one configuration: compile exclusions,
/// collect targets, stage when wrapping or empty-directory preservation
/// is requested, then create or update the archive.
///
/// The pipeline is strictly sequential and uses a fresh uniquely named
/// staging directory per invocation, so concurrent runs on the same
/// machine cannot collide. The staging tree is removed (best-effort)
/// whether or not the archive step succeeds.
///
/// # Errors
///
/// Propagates any [`crate::PackError`] from the pipeline stages.
/// Per-target misses are not errors; they surface as warnings on the
/// returned report.
///
/// # Examples
///
/// ```no_run
/// use zipack_core::ArchiveConfig;
/// use zipack_core::pack_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::load("zipack.json")?;
/// let report = pack_archive(&config)?;
/// println!("added {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn pack_archive(config: &ArchiveConfig) -> Result<PackReport> {
    let start = std::time::Instant::now();

    let matcher = ExclusionMatcher::compile(&config.exclude_globs)?;
    let set = collect(
        &config.root_dir,
        &config.targets,
        &matcher,
        config.include_empty_dirs,
    )?;

    let dest = config.archive_path();
    let mut report = if config.needs_staging() {
        let staged = StagingTree::materialize(
            &config.root_dir,
            &set,
            config.wrap_folder_name.as_deref(),
        )?;
        write_archive(
            &dest,
            config.mode,
            &BuildInput::Staged {
                dir: staged.content_dir(),
                prefix: staged.prefix(),
            },
        )?
    } else {
        write_archive(
            &dest,
            config.mode,
            &BuildInput::Files {
                root: &config.root_dir,
                files: &set.files,
            },
        )?
    };

    report.targets_skipped = set.warnings.len();
    report.warnings = set.warnings;
    report.duration = start.elapsed();
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ArchiveMode;
    use std::collections::HashSet;
    use std::fs;
    use std::fs::File;
    use std::io::Read;
    use std::path::Path;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn project_root() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src/sub")).unwrap();
        fs::write(root.join("src/a.txt"), "alpha").unwrap();
        fs::write(root.join("src/sub/b.txt"), "beta").unwrap();
        (temp, root)
    }

    fn entry_names(dest: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(dest).unwrap()).unwrap();
        archive.file_names().map(String::from).collect()
    }

    fn file_entry_names(dest: &Path) -> HashSet<String> {
        entry_names(dest)
            .into_iter()
            .filter(|n| !n.ends_with('/'))
            .collect()
    }

    #[test]
    fn test_pack_plain_overwrite() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()]).with_zip_name("out.zip");

        let report = pack_archive(&config).unwrap();

        assert_eq!(report.files_added, 2);
        assert!(!report.has_warnings());

        let names = entry_names(&root.join("out.zip"));
        assert!(names.contains(&"src/a.txt".to_string()));
        assert!(names.contains(&"src/sub/b.txt".to_string()));
        assert!(!names.iter().any(|n| n.contains("payload")));
    }

    #[test]
    fn test_pack_with_wrap_folder() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_wrap_folder("release");

        pack_archive(&config).unwrap();

        let names = entry_names(&root.join("out.zip"));
        assert!(
            names.iter().all(|n| n.starts_with("release/")),
            "unwrapped entry in {names:?}"
        );
        assert!(names.contains(&"release/src/a.txt".to_string()));
        assert!(names.contains(&"release/src/sub/b.txt".to_string()));
    }

    #[test]
    fn test_pack_missing_target_warns() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(
            &root,
            vec!["missing.txt".to_string(), "src".to_string()],
        )
        .with_zip_name("out.zip");

        let report = pack_archive(&config).unwrap();

        assert_eq!(report.targets_skipped, 1);
        assert!(report.warnings[0].contains("missing.txt"));
        assert_eq!(
            file_entry_names(&root.join("out.zip")),
            HashSet::from(["src/a.txt".to_string(), "src/sub/b.txt".to_string()])
        );
    }

    #[test]
    fn test_pack_empty_dirs_preserved() {
        let (_temp, root) = project_root();
        fs::create_dir_all(root.join("src/logs/empty")).unwrap();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_wrap_folder("payload")
            .with_include_empty_dirs(true);

        pack_archive(&config).unwrap();

        let names = entry_names(&root.join("out.zip"));
        assert!(names.contains(&"payload/src/logs/empty/".to_string()));
    }

    #[test]
    fn test_pack_empty_dirs_without_wrap_stay_root_level() {
        let (_temp, root) = project_root();
        fs::create_dir_all(root.join("src/logs/empty")).unwrap();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_include_empty_dirs(true);

        pack_archive(&config).unwrap();

        let names = entry_names(&root.join("out.zip"));
        assert!(names.contains(&"src/logs/empty/".to_string()));
        assert!(names.contains(&"src/a.txt".to_string()));
    }

    #[test]
    fn test_pack_exclusions_absent_from_archive() {
        let (_temp, root) = project_root();
        fs::create_dir(root.join("src/__pycache__")).unwrap();
        fs::write(root.join("src/__pycache__/a.pyc"), "c").unwrap();
        fs::write(root.join("src/junk.pyc"), "c").unwrap();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_exclude_globs(vec!["*.pyc".to_string(), "__pycache__".to_string()]);

        pack_archive(&config).unwrap();

        let names = entry_names(&root.join("out.zip"));
        assert!(!names.iter().any(|n| n.contains("pyc")));
        assert!(names.contains(&"src/a.txt".to_string()));
    }

    #[test]
    fn test_pack_overwrite_twice_drops_stale_entries() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()]).with_zip_name("out.zip");

        pack_archive(&config).unwrap();
        fs::remove_file(root.join("src/sub/b.txt")).unwrap();
        pack_archive(&config).unwrap();

        let names = file_entry_names(&root.join("out.zip"));
        assert_eq!(names, HashSet::from(["src/a.txt".to_string()]));
    }

    #[test]
    fn test_pack_update_idempotent() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_mode(ArchiveMode::Update);

        pack_archive(&config).unwrap();
        let once: HashSet<String> = entry_names(&root.join("out.zip")).into_iter().collect();

        pack_archive(&config).unwrap();
        let twice: HashSet<String> = entry_names(&root.join("out.zip")).into_iter().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_pack_update_replaces_changed_file() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_mode(ArchiveMode::Update);

        pack_archive(&config).unwrap();
        fs::write(root.join("src/a.txt"), "alpha-v2").unwrap();
        pack_archive(&config).unwrap();

        let mut archive =
            ZipArchive::new(File::open(root.join("out.zip")).unwrap()).unwrap();
        let mut entry = archive.by_name("src/a.txt").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "alpha-v2");
    }

    #[test]
    fn test_pack_output_dir_respected() {
        let (_temp, root) = project_root();
        let config = ArchiveConfig::new(&root, vec!["src".to_string()])
            .with_zip_name("out.zip")
            .with_output_dir(root.join("dist"));

        pack_archive(&config).unwrap();
        assert!(root.join("dist/out.zip").exists());
    }
}
