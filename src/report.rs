//! Diagnostics sink for scan and remediation events.
//!
//! A single sink is created at startup and passed by reference to the
//! [`DuplicateFinder`](crate::duplicates::DuplicateFinder) and the
//! [`Executor`](crate::actions::Executor). The console implementation shows
//! every event to the user and forwards it to the `log` facade, which the
//! logging module routes to the rotating log file.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use yansi::Paint;

use crate::actions::{ActionRecord, RemediationError, RemediationReport};
use crate::duplicates::{FingerprintGroups, ScanSummary};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{ExtensionFilter, FileRecord, ScanError};

/// Receiver of everything the scanner and executor want reported.
pub trait DiagnosticsSink {
    /// A scan of `root` is starting.
    fn on_scan_start(&self, root: &Path, filter: &ExtensionFilter);

    /// A file or directory was skipped.
    fn on_file_skipped(&self, error: &ScanError);

    /// The scan finished.
    fn on_scan_complete(&self, summary: &ScanSummary);

    /// Duplicate sets were found and `candidates` were selected.
    fn on_duplicates(&self, groups: &FingerprintGroups, candidates: &[FileRecord]);

    /// One candidate was processed.
    fn on_outcome(&self, outcome: &Result<ActionRecord, RemediationError>);

    /// A remediation batch finished.
    fn on_remediation_complete(&self, report: &RemediationReport);

    /// Free-form status line.
    fn on_notice(&self, message: &str);

    /// Scan progress display that shares the terminal with this sink.
    fn progress(&self) -> Option<Arc<dyn ProgressCallback>> {
        None
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn on_scan_start(&self, _root: &Path, _filter: &ExtensionFilter) {}
    fn on_file_skipped(&self, _error: &ScanError) {}
    fn on_scan_complete(&self, _summary: &ScanSummary) {}
    fn on_duplicates(&self, _groups: &FingerprintGroups, _candidates: &[FileRecord]) {}
    fn on_outcome(&self, _outcome: &Result<ActionRecord, RemediationError>) {}
    fn on_remediation_complete(&self, _report: &RemediationReport) {}
    fn on_notice(&self, _message: &str) {}
}

/// Sink that keeps a one-line description of each event.
///
/// Each entry starts with the event name (`scan-start`, `skipped`,
/// `scan-complete`, `duplicates`, `outcome`, `remediation-complete`,
/// `notice`) followed by `: ` and a short payload.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl DiagnosticsSink for RecordingSink {
    fn on_scan_start(&self, root: &Path, filter: &ExtensionFilter) {
        self.record(format!("scan-start: {} [{}]", root.display(), filter));
    }

    fn on_file_skipped(&self, error: &ScanError) {
        self.record(format!("skipped: {error}"));
    }

    fn on_scan_complete(&self, summary: &ScanSummary) {
        self.record(format!(
            "scan-complete: {} files, {} sets",
            summary.files_scanned, summary.duplicate_sets
        ));
    }

    fn on_duplicates(&self, groups: &FingerprintGroups, candidates: &[FileRecord]) {
        self.record(format!(
            "duplicates: {} sets, {} candidates",
            groups.duplicate_set_count(),
            candidates.len()
        ));
    }

    fn on_outcome(&self, outcome: &Result<ActionRecord, RemediationError>) {
        match outcome {
            Ok(record) => self.record(format!("outcome: {record}")),
            Err(e) => self.record(format!("outcome: {e}")),
        }
    }

    fn on_remediation_complete(&self, report: &RemediationReport) {
        self.record(format!("remediation-complete: {}", report.summary()));
    }

    fn on_notice(&self, message: &str) {
        self.record(format!("notice: {message}"));
    }
}

/// Terminal sink: prints to stdout and logs every event.
///
/// It owns the scan spinner and hides it while printing, so skipped-file
/// lines do not interleave with spinner frames.
#[derive(Clone)]
pub struct ConsoleSink {
    quiet: bool,
    color: bool,
    spinner: Arc<Progress>,
}

impl ConsoleSink {
    /// Create a console sink.
    ///
    /// In quiet mode only failures are printed; everything is still logged.
    #[must_use]
    pub fn new(quiet: bool, color: bool) -> Self {
        Self {
            quiet,
            color,
            spinner: Arc::new(Progress::new(quiet)),
        }
    }

    fn print(&self, line: &str) {
        if self.quiet {
            return;
        }
        self.write_line(line);
    }

    fn write_line(&self, line: &str) {
        self.spinner.suspend(|| {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "{line}");
        });
    }

    fn success(&self, text: String) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn failure(&self, text: String) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text
        }
    }

    fn heading(&self, text: String) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text
        }
    }
}

impl DiagnosticsSink for ConsoleSink {
    fn on_scan_start(&self, root: &Path, filter: &ExtensionFilter) {
        log::info!("Scanning for duplicates in: {} ({})", root.display(), filter);
        self.print(&format!(
            "Scanning for duplicates in: {} ({})",
            root.display(),
            filter
        ));
    }

    fn on_file_skipped(&self, error: &ScanError) {
        log::warn!("Skipped: {error}");
        self.write_line(&self.failure(format!("Skipped: {error}")));
    }

    fn on_scan_complete(&self, summary: &ScanSummary) {
        log::info!(
            "Scanning completed in {} seconds: {} files, {} duplicate sets, {} skipped",
            summary.elapsed_display(),
            summary.files_scanned,
            summary.duplicate_sets,
            summary.skipped()
        );
        self.print(&format!(
            "Scanning completed in {} seconds.",
            summary.elapsed_display()
        ));
    }

    fn on_duplicates(&self, groups: &FingerprintGroups, candidates: &[FileRecord]) {
        if candidates.is_empty() {
            log::info!("No duplicate files found.");
            self.print("No duplicate files found.");
            return;
        }

        log::info!(
            "Found {} duplicate files in {} sets ({} reclaimable)",
            candidates.len(),
            groups.duplicate_set_count(),
            bytesize::ByteSize::b(groups.reclaimable_bytes())
        );
        self.print(&self.heading(format!("Found {} duplicate files:", candidates.len())));
        for file in candidates {
            log::info!(" - {}", file.path.display());
            self.print(&format!(" - {}", file.path.display()));
        }
    }

    fn on_outcome(&self, outcome: &Result<ActionRecord, RemediationError>) {
        match outcome {
            Ok(record) => {
                log::info!("{record}");
                self.print(&self.success(record.to_string()));
            }
            Err(e) => {
                log::error!("{e}");
                self.write_line(&self.failure(e.to_string()));
            }
        }
    }

    fn on_remediation_complete(&self, report: &RemediationReport) {
        log::info!("{}", report.summary());
        self.print(&report.summary());
    }

    fn on_notice(&self, message: &str) {
        log::info!("{message}");
        self.print(message);
    }

    fn progress(&self) -> Option<Arc<dyn ProgressCallback>> {
        Some(Arc::clone(&self.spinner) as Arc<dyn ProgressCallback>)
    }
}
