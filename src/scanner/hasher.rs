//! SHA-1 file fingerprinting with streaming support.
//!
//! # Overview
//!
//! Files are read in fixed [`CHUNK_SIZE`] blocks and fed to the digest, so
//! peak memory does not depend on file size. SHA-1 is kept for compatibility
//! with fingerprints recorded by earlier cleanup runs; it is a content
//! equality proxy here, not a security boundary.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{fingerprint_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fp = hasher.fingerprint(Path::new("photo.jpg")).unwrap();
//! println!("{}", fingerprint_to_hex(&fp));
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha1::{Digest, Sha1};

use super::HashError;

/// Size of each read while streaming a file through the digest.
pub const CHUNK_SIZE: usize = 4096;

/// 160-bit SHA-1 digest of a file's full content.
pub type Fingerprint = [u8; 20];

/// Streaming content hasher.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort long reads when the flag is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Compute the fingerprint of the file at `path`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file vanished after enumeration
    /// - `PermissionDenied` if it cannot be opened for reading
    /// - `Interrupted` if shutdown was requested mid-file
    /// - `Io` for any other read failure
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.fingerprint_reader(path, file)
    }

    /// Compute the fingerprint of an arbitrary reader.
    ///
    /// `path` is only used for error reporting.
    pub fn fingerprint_reader<R: Read>(
        &self,
        path: &Path,
        mut reader: R,
    ) -> Result<Fingerprint, HashError> {
        let mut digest = Sha1::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            digest.update(&buffer[..read]);
        }

        Ok(digest.finalize().into())
    }
}

/// Render a fingerprint as 40 lowercase hex characters.
#[must_use]
pub fn fingerprint_to_hex(fp: &Fingerprint) -> String {
    use std::fmt::Write;

    fp.iter().fold(String::with_capacity(40), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
