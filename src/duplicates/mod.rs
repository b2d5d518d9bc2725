//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Walking a tree and grouping files by content fingerprint
//! - Choosing the keeper of each duplicate set
//! - Collecting the remaining copies as remediation candidates

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{select_duplicates, FingerprintGroup, FingerprintGroups};
