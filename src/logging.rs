//! Logging infrastructure for dupsweep.
//!
//! This module provides structured logging using the `log` facade and the
//! `env_logger` backend. Every record is appended to a size-bounded rotating
//! log file; with `-v` the same records are echoed to stderr.
//!
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `-v` (debug) or `-vv` (trace)
//! 3. Default: info level, so the log file keeps an audit trail of every
//!    action even in `--quiet` mode
//!
//! # Example
//!
//! ```rust,no_run
//! use dupsweep::config::LogConfig;
//! use dupsweep::logging::init_logging;
//!
//! let log_file = init_logging(0, false, &LogConfig::default(), std::path::Path::new("/tmp"));
//! log::info!("Application started");
//! ```

use chrono::Local;
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::LogConfig;

/// Timestamp layout of log records (12-hour clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// Errors from [`init_logging`].
#[derive(Debug, Error)]
pub enum LogInitError {
    /// A global logger is already installed.
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Append-only log file that rotates by size.
///
/// Before a write would push the active file past `max_bytes`, the file is
/// renamed to `name.1` (shifting `name.1` to `name.2` and so on) and a fresh
/// file is started. At most `max_files` rotated files are kept. A record
/// larger than `max_bytes` is split across files, so no file ever exceeds
/// `max_bytes`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    max_files: usize,
}

impl RotatingFile {
    /// Open (or create) the active log file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory or file cannot be created.
    pub fn open(path: PathBuf, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            written,
            max_bytes,
            max_files,
        })
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `n`-th rotated file.
    #[must_use]
    pub fn rotated_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_files == 0 {
            self.file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_files).rev() {
            let from = self.rotated_path(n);
            if from.exists() {
                fs::rename(&from, self.rotated_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.rotated_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        // Short write; `write_all` rotates again for the remainder.
        let room = self.max_bytes.saturating_sub(self.written).max(1);
        let len = buf.len().min(usize::try_from(room).unwrap_or(usize::MAX));
        self.file.write_all(&buf[..len])?;
        self.written += len as u64;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Log target writing to the rotating file and, optionally, stderr.
pub struct Tee {
    file: Option<RotatingFile>,
    echo_stderr: bool,
}

impl Tee {
    /// Create a tee; with no file, records always go to stderr.
    #[must_use]
    pub fn new(file: Option<RotatingFile>, echo_stderr: bool) -> Self {
        let echo_stderr = echo_stderr || file.is_none();
        Self { file, echo_stderr }
    }
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(ref mut file) = self.file {
            file.write_all(buf)?;
        }
        if self.echo_stderr {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        if self.echo_stderr {
            io::stderr().flush()?;
        }
        Ok(())
    }
}

/// Initialize the logging subsystem.
///
/// Call once at startup, before any logging calls are made. `directory` is
/// where the log file lives (see
/// [`Config::log_directory`](crate::config::Config::log_directory)).
///
/// Returns the active log file path, or `None` when the file could not be
/// opened and logging fell back to stderr alone.
///
/// # Errors
///
/// Fails only if a global logger is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    config: &LogConfig,
    directory: &Path,
) -> Result<Option<PathBuf>, LogInitError> {
    let path = directory.join(&config.file_name);
    let (file, open_error) = match RotatingFile::open(path, config.max_bytes, config.max_files) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };
    let file_path = file.as_ref().map(|f| f.path().to_path_buf());

    let use_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {:<5} {}",
                Local::now().format(TIMESTAMP_FORMAT),
                record.level(),
                record.args()
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(Tee::new(file, verbose > 0 && !quiet))));

    builder.try_init()?;

    match (&file_path, open_error) {
        (Some(path), _) => log::debug!(
            "Logging initialized at level {} to {}",
            current_level_name(),
            path.display()
        ),
        (None, Some(e)) => log::warn!(
            "Could not open log file in {}: {e}; logging to stderr only",
            directory.display()
        ),
        (None, None) => {}
    }

    Ok(file_path)
}

/// Determine the log level from CLI flags.
///
/// `quiet` silences the terminal, not the audit log, so it keeps info level.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Info
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
