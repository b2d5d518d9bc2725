//! Moving files into a backup folder.
//!
//! A moved file keeps its base name. When the backup folder already holds an
//! entry with that name, a numeric suffix is inserted before the extension
//! (`photo.jpg`, `photo (1).jpg`, `photo (2).jpg`, ...). Existing backups are
//! never overwritten.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Pick a path inside `dir` for `file_name` that does not exist yet.
#[must_use]
pub fn unique_destination(dir: &Path, file_name: &OsStr) -> PathBuf {
    let direct = dir.join(file_name);
    if is_free(&direct) {
        return direct;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut n: u64 = 1;
    loop {
        let mut candidate = OsString::from(stem);
        candidate.push(format!(" ({n})"));
        if let Some(ext) = extension {
            candidate.push(".");
            candidate.push(ext);
        }
        let path = dir.join(&candidate);
        if is_free(&path) {
            log::debug!(
                "Backup name {} taken, using {}",
                direct.display(),
                path.display()
            );
            return path;
        }
        n += 1;
    }
}

fn is_free(path: &Path) -> bool {
    fs::symlink_metadata(path).is_err()
}

/// Move `source` to `destination`.
///
/// Falls back to copy-then-remove when the two paths are on different
/// filesystems. If the copy succeeds but the source cannot be removed, the
/// copy is deleted again so the file exists in exactly one place.
///
/// # Errors
///
/// Returns the underlying I/O error of the rename, copy or removal.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "Cross-device move, copying {} to {}",
                source.display(),
                destination.display()
            );
            fs::copy(source, destination)?;
            if let Err(remove_err) = fs::remove_file(source) {
                let _ = fs::remove_file(destination);
                return Err(remove_err);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
