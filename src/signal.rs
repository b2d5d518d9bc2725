//! Ctrl+C handling.
//!
//! The handler only sets a shared `AtomicBool`. The walker, the hasher and
//! the remediation executor poll that flag between files (and between
//! chunks while hashing), so an interrupt never leaves a file half moved.
//!
//! ```rust,no_run
//! use dupsweep::duplicates::FinderConfig;
//! use dupsweep::signal::install_handler;
//!
//! let shutdown = install_handler();
//! let config = FinderConfig::default().with_shutdown_flag(shutdown.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared "stop as soon as it is safe" flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// A handler with no shutdown requested and no signal hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`ShutdownHandler::request`] was called.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request shutdown programmatically.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear a previous request.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Flag to hand to the finder and the executor.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static INSTALLED: OnceLock<ShutdownHandler> = OnceLock::new();

/// Hook Ctrl+C to a fresh flag.
///
/// # Errors
///
/// Fails when the process already has a Ctrl+C handler.
pub fn try_install_handler() -> Result<ShutdownHandler, SignalError> {
    let handler = ShutdownHandler::new();
    let flag = handler.flag();

    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(
            std::io::stderr(),
            "\nInterrupted. Stopping after the current file..."
        );
        let _ = std::io::stderr().flush();
        log::warn!("Interrupt received; stopping");
    })?;

    Ok(handler)
}

/// Install the Ctrl+C hook once per process and return its handler.
///
/// Later calls reuse the installed handler with its flag cleared, so
/// embedders and tests may call [`run_app`](crate::run_app) repeatedly. If
/// the hook cannot be installed the returned handler still works for
/// programmatic requests.
pub fn install_handler() -> ShutdownHandler {
    let handler = INSTALLED.get_or_init(|| match try_install_handler() {
        Ok(handler) => handler,
        Err(e) => {
            log::debug!("{e}; continuing without a Ctrl+C hook");
            ShutdownHandler::new()
        }
    });
    handler.reset();
    handler.clone()
}
