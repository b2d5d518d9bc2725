//! File actions module.
//!
//! This module provides the remediation applied to duplicate candidates:
//! - Move to system trash via the trash crate (recoverable)
//! - Permanent deletion
//! - Move into a backup folder, never overwriting an earlier backup
//!
//! Every batch is processed file by file; one failure never stops the rest.
//!
//! ```no_run
//! use dupsweep::actions::move_to_backup;
//! use std::path::Path;
//!
//! let record = move_to_backup(Path::new("/tmp/dup.txt"), Path::new("/tmp/backup"));
//! ```

pub mod backup;
pub mod remediate;

// Re-export commonly used types
pub use backup::{move_file, unique_destination};
pub use remediate::{
    move_to_backup, move_to_trash, permanent_delete, ActionRecord, ActionTaken, Executor,
    FailureKind, RemediationError, RemediationMode, RemediationOutcome, RemediationReport,
};
