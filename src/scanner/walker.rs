//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting [`FileRecord`]s for duplicate detection.
//!
//! # Features
//!
//! - Single-threaded traversal with children sorted by file name, so the
//!   same tree always yields the same order
//! - Optional symlink following with walkdir's loop detection
//! - Case-insensitive file-type filtering
//! - Pruning of excluded directories (e.g. the backup folder)
//! - Graceful shutdown via atomic flag
//!
//! Unreadable entries are yielded as [`ScanError`] values; iteration never
//! stops on an error.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupsweep::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.config.exclude_dirs.iter().any(|dir| dir == path)
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupsweep::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        walk_dir
            .into_iter()
            .filter_entry(move |entry| {
                if entry.file_type().is_dir() && self.is_excluded(entry.path()) {
                    log::debug!("Skipping excluded directory: {}", entry.path().display());
                    return false;
                }
                true
            })
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    return false;
                }
                true
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        return None;
                    }

                    let path = entry.path().to_path_buf();

                    if !self.config.extensions.matches(&path) {
                        log::trace!("Skipping file due to type filter: {}", path.display());
                        return None;
                    }

                    let metadata = match entry.metadata() {
                        Ok(m) => m,
                        Err(e) => return Some(self.handle_walk_error(e)),
                    };

                    // Symlinks that were not followed, sockets, fifos...
                    if !metadata.is_file() {
                        log::trace!("Skipping non-regular file: {}", path.display());
                        return None;
                    }

                    Some(Ok(Self::record_for(path, &metadata)))
                }
                Err(e) => Some(self.handle_walk_error(e)),
            })
    }

    fn record_for(path: PathBuf, metadata: &Metadata) -> FileRecord {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        FileRecord::new(path, metadata.len(), modified)
    }

    /// Convert a walkdir error into a [`ScanError`], logging it.
    fn handle_walk_error(&self, error: walkdir::Error) -> Result<FileRecord, ScanError> {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::debug!("Symlink loop detected, skipping: {}", path.display());
            return Err(ScanError::Loop(path));
        }

        let io_error = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("directory walk failed"));

        match io_error.kind() {
            ErrorKind::PermissionDenied => {
                log::debug!("Permission denied: {}", path.display());
                Err(ScanError::PermissionDenied(path))
            }
            ErrorKind::NotFound => {
                log::debug!("Path not found (may have been deleted): {}", path.display());
                Err(ScanError::NotFound(path))
            }
            _ => {
                log::debug!("I/O error for {}: {}", path.display(), io_error);
                Err(ScanError::Io {
                    path,
                    source: io_error,
                })
            }
        }
    }
}
