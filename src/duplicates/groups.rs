//! Fingerprint grouping and keeper selection.
//!
//! # Overview
//!
//! Files are grouped purely by fingerprint equality. Inside a group, members
//! keep the order in which the walker found them; the groups themselves are
//! ordered by the position of their first member. Both orders are stable for
//! an unchanged tree, which makes selection reproducible.
//!
//! ## Keeper selection
//!
//! The keeper of a group is its most recently modified member. Members are
//! stable-sorted by modification time, newest first, so among equal
//! timestamps the first one encountered during traversal wins.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::{select_duplicates, FingerprintGroups};
//! use dupsweep::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::{Duration, SystemTime};
//!
//! let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1);
//! let t2 = SystemTime::UNIX_EPOCH + Duration::from_secs(2);
//!
//! let mut groups = FingerprintGroups::new();
//! groups.insert([1; 20], FileRecord::new(PathBuf::from("/a.txt"), 3, t1));
//! groups.insert([1; 20], FileRecord::new(PathBuf::from("/b.txt"), 3, t2));
//!
//! let candidates = select_duplicates(&groups);
//! assert_eq!(candidates.len(), 1);
//! assert_eq!(candidates[0].path, PathBuf::from("/a.txt"));
//! ```

use std::collections::HashMap;
use std::time::SystemTime;

use crate::scanner::{fingerprint_to_hex, FileRecord, Fingerprint};

/// All files sharing one fingerprint, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintGroup {
    /// SHA-1 fingerprint shared by every member
    pub fingerprint: Fingerprint,
    /// Members in the order they were encountered
    pub files: Vec<FileRecord>,
}

impl FingerprintGroup {
    /// Create a group with a single first member.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, first: FileRecord) -> Self {
        Self {
            fingerprint,
            files: vec![first],
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// A group with two or more members is a duplicate set.
    #[must_use]
    pub fn is_duplicate_set(&self) -> bool {
        self.files.len() > 1
    }

    /// Members ordered newest first; equal timestamps keep traversal order.
    #[must_use]
    pub fn sorted_by_recency(&self) -> Vec<&FileRecord> {
        let mut sorted: Vec<&FileRecord> = self.files.iter().collect();
        // `sort_by` is stable, which is what breaks timestamp ties.
        sorted.sort_by(|a, b| b.modified.cmp(&a.modified));
        sorted
    }

    /// The file that is retained.
    ///
    /// Returns `None` only for an empty group.
    #[must_use]
    pub fn keeper(&self) -> Option<&FileRecord> {
        self.sorted_by_recency().into_iter().next()
    }

    /// Every member except the keeper, newest first.
    ///
    /// Empty for groups of fewer than two files.
    #[must_use]
    pub fn candidates(&self) -> Vec<&FileRecord> {
        if !self.is_duplicate_set() {
            return Vec::new();
        }
        self.sorted_by_recency().into_iter().skip(1).collect()
    }

    /// Bytes freed by acting on every candidate.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.candidates().iter().map(|f| f.size).sum()
    }

    /// Fingerprint as hexadecimal string.
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        fingerprint_to_hex(&self.fingerprint)
    }

    /// Latest modification time in the group.
    #[must_use]
    pub fn newest_modified(&self) -> Option<SystemTime> {
        self.files.iter().map(|f| f.modified).max()
    }
}

/// Ordered mapping from fingerprint to its group.
///
/// Built by a single writer; groups appear in the order their first member
/// was inserted.
#[derive(Debug, Clone, Default)]
pub struct FingerprintGroups {
    groups: Vec<FingerprintGroup>,
    index: HashMap<Fingerprint, usize>,
}

impl FingerprintGroups {
    /// Create an empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to the group for `fingerprint`, creating it if needed.
    pub fn insert(&mut self, fingerprint: Fingerprint, file: FileRecord) {
        match self.index.get(&fingerprint) {
            Some(&idx) => self.groups[idx].files.push(file),
            None => {
                self.index.insert(fingerprint, self.groups.len());
                self.groups.push(FingerprintGroup::new(fingerprint, file));
            }
        }
    }

    /// Look up the group for a fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&FingerprintGroup> {
        self.index.get(fingerprint).map(|&idx| &self.groups[idx])
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when nothing was grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of files across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(FingerprintGroup::len).sum()
    }

    /// Iterate over every group in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &FingerprintGroup> {
        self.groups.iter()
    }

    /// Iterate over groups with two or more members.
    pub fn duplicate_sets(&self) -> impl Iterator<Item = &FingerprintGroup> {
        self.groups.iter().filter(|g| g.is_duplicate_set())
    }

    /// Number of duplicate sets.
    #[must_use]
    pub fn duplicate_set_count(&self) -> usize {
        self.duplicate_sets().count()
    }

    /// Bytes freed by acting on every candidate of every set.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.duplicate_sets()
            .map(FingerprintGroup::reclaimable_bytes)
            .sum()
    }
}

impl<'a> IntoIterator for &'a FingerprintGroups {
    type Item = &'a FingerprintGroup;
    type IntoIter = std::slice::Iter<'a, FingerprintGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Collect the candidates of every duplicate set, keeper excluded.
///
/// Sets are visited in first-encounter order and each contributes its
/// candidates newest first.
#[must_use]
pub fn select_duplicates(groups: &FingerprintGroups) -> Vec<FileRecord> {
    let candidates: Vec<FileRecord> = groups
        .duplicate_sets()
        .flat_map(|group| group.candidates().into_iter().cloned())
        .collect();

    log::debug!(
        "Selected {} candidate(s) from {} duplicate set(s)",
        candidates.len(),
        groups.duplicate_set_count()
    );

    candidates
}
