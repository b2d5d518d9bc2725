use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
use dupsweep::report::{NullSink, RecordingSink};
use dupsweep::scanner::{fingerprint_to_hex, ExtensionFilter, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.scan(dir.path(), &NullSink).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.files_scanned, 0);
    assert_eq!(summary.duplicate_sets, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    for (name, content) in [("a.txt", "content a"), ("b.txt", "content b"), ("c.txt", "content c")] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.scan(dir.path(), &NullSink).unwrap();

    assert_eq!(groups.len(), 3);
    assert_eq!(groups.duplicate_set_count(), 0);
    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.distinct_fingerprints, 3);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("a.txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("b.txt"), b"duplicate").unwrap();
    fs::write(dir.path().join("c.txt"), b"unique").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.scan(dir.path(), &NullSink).unwrap();

    assert_eq!(groups.duplicate_set_count(), 1);
    let set = groups.duplicate_sets().next().unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.duplicate_sets, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_bytes, 9);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir").join("deeper");
    fs::create_dir_all(&sub).unwrap();

    fs::write(dir.path().join("a.txt"), b"nested dup").unwrap();
    fs::write(sub.join("b.txt"), b"nested dup").unwrap();

    let (groups, _summary) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();

    assert_eq!(groups.duplicate_set_count(), 1);
}

#[test]
fn test_scan_fingerprint_is_sha1_of_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("abc.txt"), b"abc").unwrap();

    let (groups, _summary) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();

    let group = groups.iter().next().unwrap();
    assert_eq!(
        fingerprint_to_hex(&group.fingerprint),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[test]
fn test_scan_extension_filter_limits_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"jpeg bytes").unwrap();
    fs::write(dir.path().join("b.JPG"), b"jpeg bytes").unwrap();
    fs::write(dir.path().join("a.png"), b"png bytes").unwrap();
    fs::write(dir.path().join("b.png"), b"png bytes").unwrap();

    let config = FinderConfig::default().with_walker_config(
        WalkerConfig::default().with_extensions(ExtensionFilter::parse(".jpg")),
    );
    let (groups, summary) = DuplicateFinder::new(config)
        .scan(dir.path(), &NullSink)
        .unwrap();

    assert_eq!(summary.files_scanned, 2);
    assert_eq!(groups.duplicate_set_count(), 1);
}

#[test]
fn test_scan_reports_start_and_completion() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"x").unwrap();

    let sink = RecordingSink::default();
    DuplicateFinder::with_defaults()
        .scan(dir.path(), &sink)
        .unwrap();

    let events = sink.events();
    assert!(events.first().unwrap().starts_with("scan-start"));
    assert_eq!(events.last().unwrap(), "scan-complete: 1 files, 0 sets");
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();
    fs::write(dir.path().join("c.txt"), b"other").unwrap();
    fs::write(dir.path().join("d.txt"), b"other").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.scan(dir.path(), &NullSink).unwrap();
    let (second, _) = finder.scan(dir.path(), &NullSink).unwrap();

    let flatten = |groups: &dupsweep::duplicates::FingerprintGroups| {
        groups
            .iter()
            .map(|g| {
                (
                    g.fingerprint,
                    g.files.iter().map(|f| f.path.clone()).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(flatten(&first), flatten(&second));
}
