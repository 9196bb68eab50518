//! Config-driven ZIP packaging engine.
//!
//! `zipack-core` reads a JSON configuration describing a root directory,
//! a set of targets, and exclusion patterns, collects the matching files,
//! optionally stages them under a wrap folder (preserving empty
//! directories when requested), and creates or incrementally updates a
//! ZIP archive.
//!
//! # Examples
//!
//! ```no_run
//! use zipack_core::ArchiveConfig;
//! use zipack_core::pack_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::load("zipack.json")?;
//! let report = pack_archive(&config)?;
//! println!("added {} files to {}", report.files_added, config.archive_path().display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod collect;
pub mod config;
pub mod error;
pub mod exclude;
pub mod report;
pub mod stage;

// Re-export main API types
pub use api::pack_archive;
pub use archive::BuildInput;
pub use archive::write_archive;
pub use collect::ResolvedPathSet;
pub use collect::collect;
pub use config::ArchiveConfig;
pub use config::ArchiveMode;
pub use config::DEFAULT_CONFIG_FILE;
pub use error::PackError;
pub use error::Result;
pub use exclude::ExclusionMatcher;
pub use report::PackReport;
pub use stage::StagingTree;
