use super::common::write_aged;
use dupsweep::actions::{Executor, FailureKind, RemediationMode};
use dupsweep::duplicates::{select_duplicates, DuplicateFinder, FinderError};
use dupsweep::report::{NullSink, RecordingSink};
use dupsweep::scanner::FileRecord;
use std::path::PathBuf;
use std::time::SystemTime;
use tempfile::tempdir;

#[test]
fn test_remediation_continues_past_missing_files() {
    let dir = tempdir().unwrap();
    let present = write_aged(dir.path(), "present.txt", b"here", 10);
    let candidates = vec![
        FileRecord::new(PathBuf::from("nonexistent_1.txt"), 100, SystemTime::now()),
        FileRecord::new(present.clone(), 4, SystemTime::now()),
        FileRecord::new(PathBuf::from("nonexistent_2.txt"), 100, SystemTime::now()),
    ];

    let report = Executor::new(RemediationMode::PermanentDelete, &NullSink).remediate(&candidates);

    assert_eq!(report.total_count(), 3);
    assert_eq!(report.success_count(), 1);
    assert_eq!(report.failures_of(FailureKind::NotFound), 2);
    assert!(!present.exists());
}

#[test]
fn test_backup_continues_past_missing_files() {
    let dir = tempdir().unwrap();
    let present = write_aged(dir.path(), "present.txt", b"here", 10);
    let backup = dir.path().join("bk");
    let candidates = vec![
        FileRecord::new(dir.path().join("gone.txt"), 1, SystemTime::now()),
        FileRecord::new(present.clone(), 4, SystemTime::now()),
    ];

    let report = Executor::new(RemediationMode::MoveToBackup(backup.clone()), &NullSink)
        .remediate(&candidates);

    assert_eq!(report.failures_of(FailureKind::NotFound), 1);
    assert_eq!(report.success_count(), 1);
    assert!(backup.join("present.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_aged(dir.path(), "a.txt", b"dup", 100);
    write_aged(dir.path(), "b.txt", b"dup", 10);
    let locked = dir.path().join("locked");
    write_aged(dir.path(), "locked/c.txt", b"dup", 5);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits are not enforced for root.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let sink = RecordingSink::default();
    let result = DuplicateFinder::with_defaults().scan(dir.path(), &sink);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, summary) = result.unwrap();
    assert_eq!(summary.skipped(), 1);
    assert_eq!(select_duplicates(&groups).len(), 1);
    assert!(sink.events().iter().any(|e| e.starts_with("skipped")));
}

#[test]
fn test_invalid_root_aborts_scan() {
    let dir = tempdir().unwrap();
    let file = write_aged(dir.path(), "file.txt", b"x", 1);

    let finder = DuplicateFinder::with_defaults();
    assert!(matches!(
        finder.scan(&dir.path().join("missing"), &NullSink),
        Err(FinderError::PathNotFound(_))
    ));
    assert!(matches!(
        finder.scan(&file, &NullSink),
        Err(FinderError::NotADirectory(_))
    ));
}
