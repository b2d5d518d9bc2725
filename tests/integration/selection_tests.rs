use super::common::{names, write_aged};
use dupsweep::duplicates::{select_duplicates, DuplicateFinder, FinderConfig};
use dupsweep::report::NullSink;
use dupsweep::scanner::{ExtensionFilter, WalkerConfig};
use tempfile::tempdir;

#[test]
fn test_older_copy_is_the_candidate() {
    let dir = tempdir().unwrap();
    write_aged(dir.path(), "a.txt", b"same content", 3_600);
    write_aged(dir.path(), "b.txt", b"same content", 60);

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    assert_eq!(names(candidates.into_iter().map(|f| f.path)), vec!["a.txt"]);
}

#[test]
fn test_newest_kept_regardless_of_traversal_position() {
    let dir = tempdir().unwrap();
    write_aged(dir.path(), "a.txt", b"dup", 10);
    write_aged(dir.path(), "b.txt", b"dup", 500);
    write_aged(dir.path(), "c.txt", b"dup", 100);

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();

    let set = groups.duplicate_sets().next().unwrap();
    assert!(set.keeper().unwrap().path.ends_with("a.txt"));

    // Candidates come newest-first after the keeper.
    let candidates = select_duplicates(&groups);
    assert_eq!(
        names(candidates.into_iter().map(|f| f.path)),
        vec!["c.txt", "b.txt"]
    );
}

#[test]
fn test_equal_timestamps_keep_first_in_traversal() {
    let dir = tempdir().unwrap();
    write_aged(dir.path(), "a.txt", b"tie", 100);
    write_aged(dir.path(), "b.txt", b"tie", 100);
    write_aged(dir.path(), "c.txt", b"tie", 100);

    let (groups, _) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    assert_eq!(
        names(candidates.into_iter().map(|f| f.path)),
        vec!["b.txt", "c.txt"]
    );
}

#[test]
fn test_each_set_loses_exactly_one_member() {
    let dir = tempdir().unwrap();
    write_aged(dir.path(), "x1.txt", b"x", 30);
    write_aged(dir.path(), "x2.txt", b"x", 20);
    write_aged(dir.path(), "x3.txt", b"x", 10);
    write_aged(dir.path(), "y1.txt", b"y", 30);
    write_aged(dir.path(), "y2.txt", b"y", 20);
    write_aged(dir.path(), "z.txt", b"z", 10);

    let (groups, summary) = DuplicateFinder::with_defaults()
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    assert_eq!(summary.files_scanned, 6);
    assert_eq!(candidates.len(), 3);
    assert_eq!(summary.duplicate_files, 3);
    assert!(!names(candidates.into_iter().map(|f| f.path)).contains(&"z.txt".to_string()));
}

#[test]
fn test_jpg_filter_only_selects_jpg_pair() {
    let dir = tempdir().unwrap();
    write_aged(dir.path(), "old.jpg", b"photo", 100);
    write_aged(dir.path(), "new.jpg", b"photo", 10);
    write_aged(dir.path(), "old.png", b"image", 100);
    write_aged(dir.path(), "new.png", b"image", 10);

    let config = FinderConfig::default().with_walker_config(
        WalkerConfig::default().with_extensions(ExtensionFilter::parse(".jpg")),
    );
    let (groups, _) = DuplicateFinder::new(config)
        .scan(dir.path(), &NullSink)
        .unwrap();
    let candidates = select_duplicates(&groups);

    assert_eq!(
        names(candidates.into_iter().map(|f| f.path)),
        vec!["old.jpg"]
    );
}

#[test]
fn test_selection_is_stable_across_scans() {
    let dir = tempdir().unwrap();
    write_aged(dir.path(), "a/one.bin", b"1", 50);
    write_aged(dir.path(), "b/one.bin", b"1", 40);
    write_aged(dir.path(), "c/two.bin", b"2", 30);
    write_aged(dir.path(), "d/two.bin", b"2", 30);

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.scan(dir.path(), &NullSink).unwrap();
    let (second, _) = finder.scan(dir.path(), &NullSink).unwrap();

    assert_eq!(select_duplicates(&first), select_duplicates(&second));
}
