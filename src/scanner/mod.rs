//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Deterministic, single-threaded directory walking using walkdir
//! - Content fingerprinting with streaming SHA-1
//! - Case-insensitive file-type filtering by name suffix
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-1 file fingerprinting (streaming)
//! - [`filter`]: File-type suffix filter
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{ExtensionFilter, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     extensions: ExtensionFilter::parse(".jpg,.png"),
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

pub use filter::ExtensionFilter;
pub use hasher::{fingerprint_to_hex, Fingerprint, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// A regular file discovered during the scan.
///
/// Immutable once the walker has produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Loops are detected by walkdir and reported as skipped directories.
    pub follow_symlinks: bool,

    /// Only files whose name ends with one of these suffixes are yielded.
    /// An empty filter accepts every file.
    pub extensions: ExtensionFilter,

    /// Directories pruned from the walk, along with everything beneath them.
    pub exclude_dirs: Vec<PathBuf>,
}

impl WalkerConfig {
    /// Set the file-type filter.
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionFilter) -> Self {
        self.extensions = extensions;
        self
    }

    /// Add a directory to prune from the walk.
    #[must_use]
    pub fn with_excluded_dir(mut self, dir: PathBuf) -> Self {
        self.exclude_dirs.push(dir);
        self
    }

    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Make `path` absolute and drop `.` and `..` components lexically.
///
/// Symlinks are not resolved, so the walk root and excluded directories
/// compare equal to the paths the walker yields under that root.
///
/// # Errors
///
/// Fails only when the current directory is needed and cannot be read.
pub fn normalize_path(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A symbolic link points back at one of its ancestors.
    #[error("Symlink loop detected: {0}")]
    Loop(PathBuf),

    /// An I/O error occurred while accessing a file or directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file was enumerated but could not be fingerprinted.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Path of the file or directory that was skipped.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Loop(p) => p,
            Self::Io { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Interrupted(p) => p,
            Self::Io { path, .. } => path,
        }
    }

    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
