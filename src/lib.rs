//! dupsweep - duplicate file sweeper
//!
//! Scans a directory tree, groups files by SHA-1 content fingerprint, keeps
//! the most recently modified copy of each duplicate set, and deletes, trashes
//! or backs up the older copies after a single confirmation.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod scanner;
pub mod signal;

pub use app::{run_app, RunOutcome};
