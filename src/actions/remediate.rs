//! Remediation of duplicate candidates.
//!
//! # Overview
//!
//! The [`Executor`] applies one [`RemediationMode`] to every candidate:
//! - Permanent deletion
//! - Move to the system trash (recoverable)
//! - Move into a backup folder
//!
//! Candidates are handled one at a time and each failure is isolated: the
//! error is recorded, reported to the diagnostics sink, and the next file is
//! processed. Nothing is touched before the user has confirmed the whole
//! batch once (see [`Executor::confirm_and_remediate`]).
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::{Executor, RemediationMode};
//! use dupsweep::report::NullSink;
//! use dupsweep::scanner::FileRecord;
//!
//! let candidates: Vec<FileRecord> = Vec::new();
//! let executor = Executor::new(RemediationMode::MoveToTrash, &NullSink);
//! let report = executor.remediate(&candidates);
//! println!("{}", report.summary());
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytesize::ByteSize;
use thiserror::Error;

use super::backup::{move_file, unique_destination};
use crate::prompt::Confirmer;
use crate::report::DiagnosticsSink;
use crate::scanner::FileRecord;

/// What to do with every candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationMode {
    /// Remove the file; irreversible.
    PermanentDelete,
    /// Move the file to the platform trash / recycle bin.
    MoveToTrash,
    /// Move the file into this directory, creating it if needed.
    MoveToBackup(PathBuf),
}

impl RemediationMode {
    /// Question asked before the batch runs.
    #[must_use]
    pub fn confirmation_prompt(&self) -> &'static str {
        match self {
            Self::PermanentDelete => {
                "Are you sure you want to delete these older duplicates? (yes/no): "
            }
            Self::MoveToTrash => {
                "Are you sure you want to move these older duplicates to trash? (yes/no): "
            }
            Self::MoveToBackup(_) => {
                "Are you sure you want to move these older duplicates to the backup folder? (yes/no): "
            }
        }
    }

    /// Message shown when the batch has run.
    #[must_use]
    pub fn completed_message(&self) -> &'static str {
        match self {
            Self::PermanentDelete => "Deletion complete.",
            Self::MoveToTrash => "Moved to trash complete.",
            Self::MoveToBackup(_) => "Backup complete.",
        }
    }

    /// Message shown when the user declines.
    #[must_use]
    pub fn canceled_message(&self) -> &'static str {
        match self {
            Self::PermanentDelete => "Deletion canceled.",
            Self::MoveToTrash => "Move to trash canceled.",
            Self::MoveToBackup(_) => "Backup canceled.",
        }
    }
}

impl fmt::Display for RemediationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermanentDelete => write!(f, "permanent delete"),
            Self::MoveToTrash => write!(f, "move to trash"),
            Self::MoveToBackup(dir) => write!(f, "move to backup ({})", dir.display()),
        }
    }
}

/// Error type for a single remediation.
#[derive(Debug, Error)]
pub enum RemediationError {
    /// File was not found (deleted or moved since the scan).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when acting on the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("Error processing {path}: trash operation failed: {message}")]
    TrashFailed {
        /// File that could not be trashed
        path: PathBuf,
        /// Message reported by the platform trash
        message: String,
    },

    /// The backup directory could not be created.
    #[error("Error processing {path}: cannot create backup folder {dir}: {source}")]
    BackupDir {
        /// File that was to be moved
        path: PathBuf,
        /// Backup directory
        dir: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Any other I/O error.
    #[error("Error processing {path}: {source}")]
    Io {
        /// File being processed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of a [`RemediationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file vanished before the action
    NotFound,
    /// The action was not permitted
    PermissionDenied,
    /// Anything else
    Io,
}

impl RemediationError {
    /// Path of the candidate this error is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::TrashFailed { path, .. }
            | Self::BackupDir { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    /// Classify the failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::PermissionDenied(_) => FailureKind::PermissionDenied,
            Self::TrashFailed { .. } | Self::BackupDir { .. } | Self::Io { .. } => FailureKind::Io,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// What was done to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTaken {
    /// Removed permanently
    Deleted,
    /// Moved to the system trash
    Trashed,
    /// Moved into the backup folder at this path
    BackedUp(PathBuf),
}

/// Result of a successful remediation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Original location of the file.
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub size: u64,
    /// Action applied.
    pub action: ActionTaken,
}

impl ActionRecord {
    /// Where the file is now, if it still exists somewhere addressable.
    #[must_use]
    pub fn resulting_path(&self) -> Option<&Path> {
        match &self.action {
            ActionTaken::BackedUp(dest) => Some(dest),
            ActionTaken::Deleted | ActionTaken::Trashed => None,
        }
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            ActionTaken::Deleted => write!(f, "Deleted: {}", self.path.display()),
            ActionTaken::Trashed => write!(f, "Moved to trash: {}", self.path.display()),
            ActionTaken::BackedUp(dest) => write!(
                f,
                "Moved to backup: {} -> {}",
                self.path.display(),
                dest.display()
            ),
        }
    }
}

/// Results of a batch remediation.
#[derive(Debug, Default)]
pub struct RemediationReport {
    /// Files acted on successfully.
    pub successes: Vec<ActionRecord>,
    /// Files that failed, in processing order.
    pub failures: Vec<RemediationError>,
    /// Total bytes moved out of the scanned tree.
    pub bytes_reclaimed: u64,
    /// Whether the batch stopped early on shutdown.
    pub interrupted: bool,
}

impl RemediationReport {
    /// Number of successful actions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed actions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of failures of a given kind.
    #[must_use]
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|e| e.kind() == kind).count()
    }

    /// Total number of attempted actions.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if every action succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Processed {} file(s): {} succeeded, {} failed, {} reclaimed",
            self.total_count(),
            self.success_count(),
            self.failure_count(),
            ByteSize::b(self.bytes_reclaimed)
        );
        if self.interrupted {
            text.push_str(" (interrupted)");
        }
        text
    }
}

/// Outcome of [`Executor::confirm_and_remediate`].
#[derive(Debug)]
pub enum RemediationOutcome {
    /// The user declined; nothing was touched.
    Declined,
    /// The batch ran.
    Completed(RemediationReport),
}

/// Applies a [`RemediationMode`] to candidates, one file at a time.
pub struct Executor<'a> {
    mode: RemediationMode,
    sink: &'a dyn DiagnosticsSink,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<'a> Executor<'a> {
    /// Create an executor reporting to `sink`.
    #[must_use]
    pub fn new(mode: RemediationMode, sink: &'a dyn DiagnosticsSink) -> Self {
        Self {
            mode,
            sink,
            shutdown_flag: None,
        }
    }

    /// Stop between files when the flag is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> &RemediationMode {
        &self.mode
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Ask once for confirmation, then remediate every candidate.
    ///
    /// Declining returns [`RemediationOutcome::Declined`] without touching
    /// the filesystem.
    pub fn confirm_and_remediate(
        &self,
        candidates: &[FileRecord],
        confirmer: &mut dyn Confirmer,
    ) -> RemediationOutcome {
        if !confirmer.confirm(self.mode.confirmation_prompt()) {
            log::info!("Remediation ({}) declined by user", self.mode);
            self.sink.on_notice(self.mode.canceled_message());
            return RemediationOutcome::Declined;
        }

        let report = self.remediate(candidates);
        self.sink.on_notice(self.mode.completed_message());
        RemediationOutcome::Completed(report)
    }

    /// Apply the mode to every candidate, continuing past failures.
    ///
    /// Callers are responsible for having obtained confirmation.
    pub fn remediate(&self, candidates: &[FileRecord]) -> RemediationReport {
        let mut report = RemediationReport::default();

        log::info!(
            "Applying {} to {} candidate(s)",
            self.mode,
            candidates.len()
        );

        for file in candidates {
            if self.is_shutdown_requested() {
                log::info!("Remediation interrupted; remaining files left untouched");
                report.interrupted = true;
                break;
            }

            let result = self.apply(file);
            self.sink.on_outcome(&result);

            match result {
                Ok(record) => {
                    report.bytes_reclaimed += record.size;
                    report.successes.push(record);
                }
                Err(e) => report.failures.push(e),
            }
        }

        log::info!("{}", report.summary());
        self.sink.on_remediation_complete(&report);

        report
    }

    /// Apply the mode to a single file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file no longer exists
    /// - `PermissionDenied` if the action is not allowed
    /// - `TrashFailed`, `BackupDir` or `Io` for other failures
    pub fn apply(&self, file: &FileRecord) -> Result<ActionRecord, RemediationError> {
        match &self.mode {
            RemediationMode::PermanentDelete => permanent_delete(&file.path),
            RemediationMode::MoveToTrash => move_to_trash(&file.path),
            RemediationMode::MoveToBackup(dir) => move_to_backup(&file.path, dir),
        }
    }
}

/// Current size of `path`, classifying a missing or forbidden file.
fn current_size(path: &Path) -> Result<u64, RemediationError> {
    fs::symlink_metadata(path)
        .map(|m| m.len())
        .map_err(|e| RemediationError::from_io(path, e))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied` or `Io`.
pub fn permanent_delete(path: &Path) -> Result<ActionRecord, RemediationError> {
    let size = current_size(path)?;

    fs::remove_file(path).map_err(|e| RemediationError::from_io(path, e))?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(ActionRecord {
        path: path.to_path_buf(),
        size,
        action: ActionTaken::Deleted,
    })
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied` or `TrashFailed`.
pub fn move_to_trash(path: &Path) -> Result<ActionRecord, RemediationError> {
    let size = current_size(path)?;

    trash::delete(path).map_err(|e| trash_error(path, e))?;

    log::debug!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(ActionRecord {
        path: path.to_path_buf(),
        size,
        action: ActionTaken::Trashed,
    })
}

/// Filesystem errors from the trash backend keep their not-found and
/// permission-denied classes; everything else is a trash failure.
fn trash_error(path: &Path, error: trash::Error) -> RemediationError {
    match error {
        #[cfg(all(
            unix,
            not(target_os = "macos"),
            not(target_os = "ios"),
            not(target_os = "android")
        ))]
        trash::Error::FileSystem { source, .. } => RemediationError::from_io(path, source),
        other => RemediationError::TrashFailed {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Move a single file into `backup_dir`, keeping its base name.
///
/// The directory is created if missing. Name collisions get a ` (n)` suffix.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied`, `BackupDir` or `Io`.
pub fn move_to_backup(path: &Path, backup_dir: &Path) -> Result<ActionRecord, RemediationError> {
    let size = current_size(path)?;

    let file_name = path.file_name().ok_or_else(|| RemediationError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;

    fs::create_dir_all(backup_dir).map_err(|source| RemediationError::BackupDir {
        path: path.to_path_buf(),
        dir: backup_dir.to_path_buf(),
        source,
    })?;

    let destination = unique_destination(backup_dir, file_name);
    move_file(path, &destination).map_err(|e| RemediationError::from_io(path, e))?;

    log::debug!(
        "Moved to backup: {} -> {}",
        path.display(),
        destination.display()
    );
    Ok(ActionRecord {
        path: path.to_path_buf(),
        size,
        action: ActionTaken::BackedUp(destination),
    })
}
