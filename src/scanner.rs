/*!
 * Directory traversal and per-file processing
 */

use std::path::Path;

use glob_match::glob_match;
use log::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::reader::read_xml;
use crate::tags::scan_class_names;
use crate::types::{FileOutcome, FileReport, ScanStatistics};
use crate::utils::is_target_file;

/// Scanner for target files below a root directory
pub struct Scanner {
    /// Scanner configuration
    config: Config,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scan the root directory and return the statistics of this run
    ///
    /// Fails only when the configuration is invalid, typically a root that is
    /// missing or not a directory. Problems with individual files are logged
    /// and counted.
    pub fn scan(&self) -> crate::error::Result<ScanStatistics> {
        self.config.validate()?;

        info!("=== TAG EXTRACTION STARTED ===");
        info!("");

        let mut stats = ScanStatistics::default();

        let walker = WalkDir::new(&self.config.root_dir)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_ignore(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if self.is_target(&entry) {
                self.process_file(entry.path(), &mut stats);
            }
        }

        Ok(stats)
    }

    /// Decode one target file, scan it, and record the outcome in `stats`
    pub fn process_file(&self, path: &Path, stats: &mut ScanStatistics) {
        stats.files_processed += 1;
        info!("Processing file: {}", path.display());

        let outcome = match read_xml(path) {
            None => {
                stats.files_with_errors += 1;
                error!("❌ Failed to read {}", path.display());
                info!("");
                FileOutcome::Unreadable
            }
            Some(decoded) => match scan_class_names(&decoded.text, &self.config.markers) {
                Ok(matches) => {
                    info!("Results for {}:", path.display());
                    for (marker, value) in &matches.found {
                        info!("  {} found: {}", marker, value);
                    }
                    if !matches.missing.is_empty() {
                        info!("  Markers not found: {}", matches.missing.join(", "));
                    }
                    info!("");

                    stats.tags_found += matches.found.len();
                    FileOutcome::Scanned {
                        encoding: decoded.encoding,
                        matches,
                    }
                }
                Err(e) => {
                    error!("Failed to parse XML in {}: {}", path.display(), e);
                    info!("");
                    FileOutcome::ParseFailed {
                        encoding: decoded.encoding,
                        message: e.to_string(),
                    }
                }
            },
        };

        stats.files.push(FileReport {
            path: path.to_path_buf(),
            outcome,
        });
    }

    /// Check if an entry should be skipped based on the ignore patterns
    pub fn should_ignore(&self, path: &Path) -> bool {
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();

        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
    }

    /// Check whether an entry is a file named like the target, ignoring case
    fn is_target(&self, entry: &DirEntry) -> bool {
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());

        is_file && is_target_file(&entry.file_name().to_string_lossy(), &self.config.target_file)
    }
}
