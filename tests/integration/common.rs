//! Fixture helpers shared by the integration tests.

use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Write `content` to `dir/name` (creating parent dirs) with an mtime
/// `age_secs` seconds in the past.
pub fn write_aged(dir: &Path, name: &str, content: &[u8], age_secs: u64) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(age_secs);
    filetime::set_file_mtime(&path, FileTime::from_system_time(mtime)).unwrap();
    path
}

/// File names of `paths`, for order-sensitive assertions.
pub fn names(paths: impl IntoIterator<Item = PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
