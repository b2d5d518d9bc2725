//! Command-line interface definitions for dupsweep.
//!
//! Every interactive question has a flag that answers it in advance, so the
//! same pipeline serves both a person at a terminal and a script.
//!
//! # Example
//!
//! ```bash
//! # Scan ~/Downloads interactively
//! dupsweep
//!
//! # Only images, move older copies to the trash without asking
//! dupsweep ~/Pictures --ext .jpg,.png --action trash --yes
//!
//! # List duplicates only, never prompt
//! dupsweep /data --action none --non-interactive
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scanner::ExtensionFilter;

/// Find files with identical content and clean up the older copies.
///
/// The most recently modified copy of every duplicate set is kept; the
/// others can be deleted, moved to the trash, or moved to a backup folder.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (default: configured root, else your Downloads folder)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// File types to include, comma-separated (e.g. .jpg,.png); may repeat
    ///
    /// Entries must start with a dot. When absent, you are asked
    /// interactively; a blank answer scans all files.
    #[arg(short, long = "ext", value_name = "LIST")]
    pub extensions: Vec<String>,

    /// What to do with older duplicates
    #[arg(short, long, value_enum, value_name = "ACTION")]
    pub action: Option<ActionArg>,

    /// Backup folder for --action backup (default: <PATH>/Duplicates_Backup)
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Answer yes to the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Never prompt; unanswered questions fall back to safe defaults
    #[arg(long)]
    pub non_interactive: bool,

    /// Follow symbolic links during the scan
    ///
    /// Symlink cycles are detected and skipped.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the rotating log file
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace); also echoes the log to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Filter built from all `--ext` values, with the rejected entries.
    ///
    /// `None` when no `--ext` flag was given.
    #[must_use]
    pub fn extension_filter(&self) -> Option<(ExtensionFilter, Vec<String>)> {
        if self.extensions.is_empty() {
            None
        } else {
            Some(ExtensionFilter::from_lists(&self.extensions))
        }
    }
}

/// Remediation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Permanently delete older duplicates
    Delete,
    /// Move older duplicates to the system trash
    Trash,
    /// Move older duplicates into the backup folder
    Backup,
    /// Only list duplicates
    None,
}

impl std::fmt::Display for ActionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionArg::Delete => write!(f, "delete"),
            ActionArg::Trash => write!(f, "trash"),
            ActionArg::Backup => write!(f, "backup"),
            ActionArg::None => write!(f, "none"),
        }
    }
}
