//! Duplicate finder: walk, fingerprint, group.
//!
//! # Overview
//!
//! [`DuplicateFinder::scan`] validates the root, walks it with the
//! [`Walker`](crate::scanner::Walker), fingerprints every matching file with
//! the streaming [`Hasher`], and groups the results with
//! [`FingerprintGroups`]. Files or directories that cannot be read are
//! reported to the injected [`DiagnosticsSink`] and skipped; only an invalid
//! root aborts the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{select_duplicates, DuplicateFinder, FinderConfig};
//! use dupsweep::report::NullSink;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.scan(Path::new("/some/path"), &NullSink).unwrap();
//!
//! println!("{} duplicate sets", summary.duplicate_sets);
//! for file in select_duplicates(&groups) {
//!     println!("candidate: {}", file.path.display());
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::FingerprintGroups;
use crate::progress::ProgressCallback;
use crate::report::DiagnosticsSink;
use crate::scanner::{normalize_path, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Absolute root that was scanned
    pub root: PathBuf,
    /// Number of files successfully fingerprinted
    pub files_scanned: usize,
    /// Total bytes read while fingerprinting
    pub bytes_hashed: u64,
    /// Number of distinct fingerprints
    pub distinct_fingerprints: usize,
    /// Number of fingerprint groups with two or more files
    pub duplicate_sets: usize,
    /// Number of files that are not the keeper of their set
    pub duplicate_files: usize,
    /// Bytes that acting on every candidate would free
    pub reclaimable_bytes: u64,
    /// Duration of the scan
    pub scan_duration: Duration,
    /// Files and directories that were skipped, with the reason
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Number of skipped files or directories.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_bytes).to_string()
    }

    /// Scan duration in seconds with two decimals, e.g. `"1.25"`.
    #[must_use]
    pub fn elapsed_display(&self) -> String {
        format!("{:.2}", self.scan_duration.as_secs_f64())
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root exists but cannot be listed.
    #[error("Cannot read directory {path}: {source}")]
    Unreadable {
        /// The root directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Duplicate finder that runs the walk → fingerprint → group pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(Arc::clone(flag));
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Check that `root` is a readable directory and return its absolute form.
    ///
    /// # Errors
    ///
    /// `PathNotFound`, `NotADirectory` or `Unreadable`.
    pub fn validate_root(root: &Path) -> Result<PathBuf, FinderError> {
        let absolute = normalize_path(root).map_err(|source| FinderError::Unreadable {
            path: root.to_path_buf(),
            source,
        })?;

        if !absolute.exists() {
            return Err(FinderError::PathNotFound(absolute));
        }
        if !absolute.is_dir() {
            return Err(FinderError::NotADirectory(absolute));
        }
        if let Err(source) = fs::read_dir(&absolute) {
            return Err(FinderError::Unreadable {
                path: absolute,
                source,
            });
        }
        Ok(absolute)
    }

    /// Scan `root` and group its files by content fingerprint.
    ///
    /// Every skipped file or directory is passed to `sink` as it happens and
    /// collected in [`ScanSummary::errors`].
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the root is invalid or the scan is interrupted.
    pub fn scan(
        &self,
        root: &Path,
        sink: &dyn DiagnosticsSink,
    ) -> Result<(FingerprintGroups, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let root = Self::validate_root(root)?;

        let mut walker_config = self.config.walker_config.clone();
        walker_config.exclude_dirs = walker_config
            .exclude_dirs
            .iter()
            .filter_map(|dir| normalize_path(dir).ok())
            .collect();

        sink.on_scan_start(&root, &walker_config.extensions);
        log::info!("Starting duplicate scan of {}", root.display());

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut walker = Walker::new(&root, walker_config);
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", 0);
        }

        let mut summary = ScanSummary {
            root: root.clone(),
            ..Default::default()
        };
        let mut groups = FingerprintGroups::new();

        for result in walker.walk() {
            let file = match result {
                Ok(file) => file,
                Err(e) => {
                    sink.on_file_skipped(&e);
                    summary.errors.push(e);
                    continue;
                }
            };

            match self.hasher.fingerprint(&file.path) {
                Ok(fingerprint) => {
                    log::trace!("Fingerprinted {}", file.path.display());
                    summary.files_scanned += 1;
                    summary.bytes_hashed += file.size;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(summary.files_scanned, &file.path.to_string_lossy());
                    }
                    groups.insert(fingerprint, file);
                }
                Err(HashError::Interrupted(_)) => break,
                Err(e) => {
                    log::debug!("Failed to hash {}: {}", file.path.display(), e);
                    let e = ScanError::Hash(e);
                    sink.on_file_skipped(&e);
                    summary.errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }

        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted by shutdown signal");
            return Err(FinderError::Interrupted);
        }

        summary.distinct_fingerprints = groups.len();
        summary.duplicate_sets = groups.duplicate_set_count();
        summary.duplicate_files = groups.duplicate_sets().map(|g| g.len() - 1).sum();
        summary.reclaimable_bytes = groups.reclaimable_bytes();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicate sets, {} duplicates, {} reclaimable",
            summary.files_scanned,
            summary.duplicate_sets,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        sink.on_scan_complete(&summary);

        Ok((groups, summary))
    }
}
