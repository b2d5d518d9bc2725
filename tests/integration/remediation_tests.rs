use super::common::write_aged;
use dupsweep::actions::{ActionTaken, Executor, FailureKind, RemediationMode, RemediationOutcome};
use dupsweep::duplicates::{select_duplicates, DuplicateFinder};
use dupsweep::prompt::{AssumeNo, AssumeYes, Prompter};
use dupsweep::report::{NullSink, RecordingSink};
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

#[test]
fn test_declining_leaves_tree_unchanged() {
    let dir = tempdir().unwrap();
    let old = write_aged(dir.path(), "a.txt", b"dup", 100);
    let new = write_aged(dir.path(), "b.txt", b"dup", 10);

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    for mode in [
        RemediationMode::PermanentDelete,
        RemediationMode::MoveToTrash,
        RemediationMode::MoveToBackup(dir.path().join("bk")),
    ] {
        let outcome =
            Executor::new(mode, &NullSink).confirm_and_remediate(&candidates, &mut AssumeNo);
        assert!(matches!(outcome, RemediationOutcome::Declined));
    }

    assert!(old.exists());
    assert!(new.exists());
    assert!(!dir.path().join("bk").exists());
}

#[test]
fn test_prompted_confirmation_then_delete() {
    let dir = tempdir().unwrap();
    let old = write_aged(dir.path(), "a.txt", b"dup", 100);
    let new = write_aged(dir.path(), "b.txt", b"dup", 10);

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    let mut prompter = Prompter::new(Cursor::new(b"what\ny\n".to_vec()), Vec::new());
    let outcome = Executor::new(RemediationMode::PermanentDelete, &NullSink)
        .confirm_and_remediate(&candidates, &mut prompter);

    match outcome {
        RemediationOutcome::Completed(report) => {
            assert_eq!(report.success_count(), 1);
            assert_eq!(report.bytes_reclaimed, 3);
        }
        RemediationOutcome::Declined => panic!("Expected the batch to run"),
    }
    assert!(!old.exists());
    assert!(new.exists());
}

#[test]
fn test_backup_into_fresh_directory() {
    let dir = tempdir().unwrap();
    let old = write_aged(dir.path(), "photos/a.jpg", b"jpeg data", 100);
    write_aged(dir.path(), "photos/b.jpg", b"jpeg data", 10);
    let backup = dir.path().join("Duplicates_Backup");

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    let report = Executor::new(RemediationMode::MoveToBackup(backup.clone()), &NullSink)
        .remediate(&candidates);

    assert!(report.all_succeeded());
    assert!(backup.is_dir());
    assert!(!old.exists());
    assert_eq!(fs::read(backup.join("a.jpg")).unwrap(), b"jpeg data");
    assert_eq!(
        report.successes[0].action,
        ActionTaken::BackedUp(backup.join("a.jpg"))
    );
}

#[test]
fn test_backup_collisions_keep_both_files() {
    let dir = tempdir().unwrap();
    // Two different duplicate sets whose older members share a base name.
    let first = write_aged(dir.path(), "x/report.pdf", b"version one", 100);
    write_aged(dir.path(), "x/report-copy.pdf", b"version one", 10);
    let second = write_aged(dir.path(), "y/report.pdf", b"version two", 100);
    write_aged(dir.path(), "y/report-copy.pdf", b"version two", 10);
    let backup = dir.path().join("bk");

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);
    assert_eq!(candidates.len(), 2);

    let report = Executor::new(RemediationMode::MoveToBackup(backup.clone()), &NullSink)
        .remediate(&candidates);

    assert!(report.all_succeeded());
    assert!(!first.exists());
    assert!(!second.exists());
    assert_eq!(fs::read(backup.join("report.pdf")).unwrap(), b"version one");
    assert_eq!(fs::read(backup.join("report (1).pdf")).unwrap(), b"version two");
}

#[test]
fn test_externally_deleted_candidate_is_reported_and_others_continue() {
    let dir = tempdir().unwrap();
    let a_old = write_aged(dir.path(), "a_old.txt", b"alpha", 100);
    write_aged(dir.path(), "a_new.txt", b"alpha", 10);
    let b_old = write_aged(dir.path(), "b_old.txt", b"beta", 100);
    write_aged(dir.path(), "b_new.txt", b"beta", 10);

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);
    assert_eq!(candidates.len(), 2);

    // Removed by someone else after the scan.
    fs::remove_file(&a_old).unwrap();

    let sink = RecordingSink::default();
    let outcome = Executor::new(RemediationMode::PermanentDelete, &sink)
        .confirm_and_remediate(&candidates, &mut AssumeYes);

    let RemediationOutcome::Completed(report) = outcome else {
        panic!("Expected the batch to run");
    };
    assert_eq!(report.failures_of(FailureKind::NotFound), 1);
    assert_eq!(report.success_count(), 1);
    assert!(!b_old.exists());

    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| e.starts_with("outcome: File not found:") && e.contains("a_old.txt")));
    assert!(events
        .iter()
        .any(|e| e.starts_with("outcome: Deleted:") && e.contains("b_old.txt")));
    assert!(events.iter().any(|e| e.starts_with("remediation-complete")));
}
