//! The end-to-end run: configure, scan, report, remediate.
//!
//! [`run_app`] wires the process-wide pieces (configuration, logging, the
//! Ctrl+C hook, the console sink and the terminal prompter) and hands them to
//! [`run_pipeline`], which is also usable directly by embedders and tests.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use directories::UserDirs;
use thiserror::Error;

use crate::actions::{Executor, RemediationMode, RemediationOutcome};
use crate::cli::{ActionArg, Cli};
use crate::config::Config;
use crate::duplicates::{select_duplicates, DuplicateFinder, FinderConfig};
use crate::logging;
use crate::prompt::{ActionChoice, AssumeNo, AssumeYes, Confirmer, Prompter};
use crate::report::{ConsoleSink, DiagnosticsSink};
use crate::scanner::{normalize_path, ExtensionFilter, WalkerConfig};
use crate::signal::{self, ShutdownHandler};

/// Fatal conditions raised by the run itself.
#[derive(Debug, Error)]
pub enum AppError {
    /// No path given, none configured, and no Downloads folder found.
    #[error("Could not determine a directory to scan; pass PATH or set default_root")]
    NoDefaultRoot,

    /// Ctrl+C stopped remediation before every candidate was processed.
    #[error("Interrupted after processing {processed} of {total} file(s)")]
    Interrupted {
        /// Candidates handled before the interrupt
        processed: usize,
        /// Candidates selected
        total: usize,
    },
}

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Absolute root that was scanned.
    pub root: PathBuf,
    /// Number of remediation candidates (older duplicates) found.
    pub duplicates_found: usize,
    /// Candidates successfully deleted, trashed or backed up.
    pub acted: usize,
    /// Candidates whose remediation failed.
    pub failed: usize,
    /// Files or directories skipped during the scan.
    pub skipped: usize,
    /// Remediation that was applied, if any.
    pub action: Option<RemediationMode>,
}

/// Run dupsweep with process-wide logging, signal handling and terminal I/O.
///
/// # Errors
///
/// Configuration errors, an invalid root, and interrupts are returned;
/// per-file failures are reported and counted in [`RunOutcome`].
pub fn run_app(cli: Cli) -> anyhow::Result<RunOutcome> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    let log_dir = config.log_directory();
    match logging::init_logging(cli.verbose, cli.quiet, &config.log, &log_dir) {
        Ok(Some(path)) => log::info!(
            "dupsweep {} logging to {}",
            env!("CARGO_PKG_VERSION"),
            path.display()
        ),
        Ok(None) => {}
        Err(e) => log::debug!("{e}"),
    }

    if cli.no_color {
        yansi::disable();
    }

    let sink = ConsoleSink::new(cli.quiet, !cli.no_color);
    let shutdown = signal::install_handler();
    let started = Instant::now();

    let result = if cli.non_interactive {
        run_pipeline(
            &cli,
            &config,
            &sink,
            None::<&mut Prompter<io::StdinLock<'static>, io::Stdout>>,
            &shutdown,
        )
    } else {
        let mut prompter = Prompter::stdio();
        run_pipeline(&cli, &config, &sink, Some(&mut prompter), &shutdown)
    };

    log::info!(
        "Run finished in {:.2} seconds",
        started.elapsed().as_secs_f64()
    );
    result
}

/// The scan → select → remediate pipeline.
///
/// `prompter` is `None` in non-interactive mode: questions not answered by
/// flags or configuration fall back to no filter, no action and no
/// confirmation.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_pipeline<R: BufRead, W: Write>(
    cli: &Cli,
    config: &Config,
    sink: &dyn DiagnosticsSink,
    mut prompter: Option<&mut Prompter<R, W>>,
    shutdown: &ShutdownHandler,
) -> anyhow::Result<RunOutcome> {
    let requested_root = resolve_root(cli.path.as_deref(), config.default_root.as_deref())
        .ok_or(AppError::NoDefaultRoot)?;
    let root = DuplicateFinder::validate_root(&requested_root)
        .with_context(|| format!("Cannot scan {}", requested_root.display()))?;

    let filter = choose_filter(cli, config, prompter.as_deref_mut(), sink)?;

    let backup_dir = match cli.backup_dir {
        Some(ref dir) => normalize_path(dir)
            .with_context(|| format!("Invalid backup folder {}", dir.display()))?,
        None => root.join(&config.backup_dir_name),
    };

    let walker_config = WalkerConfig::default()
        .with_extensions(filter)
        .with_follow_symlinks(config.follow_symlinks)
        .with_excluded_dir(backup_dir.clone());
    let mut finder_config = FinderConfig::default()
        .with_walker_config(walker_config)
        .with_shutdown_flag(shutdown.flag());
    if let Some(progress) = sink.progress() {
        finder_config = finder_config.with_progress_callback(progress);
    }
    let finder = DuplicateFinder::new(finder_config);

    let (groups, summary) = finder.scan(&root, sink)?;
    let candidates = select_duplicates(&groups);
    sink.on_duplicates(&groups, &candidates);

    let mut outcome = RunOutcome {
        root,
        duplicates_found: candidates.len(),
        skipped: summary.skipped(),
        ..RunOutcome::default()
    };
    if candidates.is_empty() {
        return Ok(outcome);
    }

    let Some(mode) = choose_mode(cli, prompter.as_deref_mut(), &backup_dir, sink)? else {
        return Ok(outcome);
    };

    let mut assume_yes = AssumeYes;
    let mut assume_no = AssumeNo;
    let confirmer: &mut dyn Confirmer = if cli.yes {
        &mut assume_yes
    } else if let Some(p) = prompter.as_deref_mut() {
        p
    } else {
        sink.on_notice("Confirmation required; rerun with --yes to apply without prompting.");
        &mut assume_no
    };

    let executor = Executor::new(mode.clone(), sink).with_shutdown_flag(shutdown.flag());
    if let RemediationOutcome::Completed(report) =
        executor.confirm_and_remediate(&candidates, confirmer)
    {
        outcome.acted = report.success_count();
        outcome.failed = report.failure_count();
        outcome.action = Some(mode);

        if report.interrupted {
            return Err(AppError::Interrupted {
                processed: report.total_count(),
                total: candidates.len(),
            }
            .into());
        }
    }

    Ok(outcome)
}

/// Root to scan: explicit path, else configured root, else Downloads.
#[must_use]
pub fn resolve_root(explicit: Option<&Path>, configured: Option<&Path>) -> Option<PathBuf> {
    explicit
        .or(configured)
        .map(Path::to_path_buf)
        .or_else(default_downloads_dir)
}

fn default_downloads_dir() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.download_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.home_dir().join("Downloads")),
    )
}

/// `--ext` wins, then the configured list, then the interactive question.
fn choose_filter<R: BufRead, W: Write>(
    cli: &Cli,
    config: &Config,
    prompter: Option<&mut Prompter<R, W>>,
    sink: &dyn DiagnosticsSink,
) -> io::Result<ExtensionFilter> {
    let answer = match (cli.extension_filter(), prompter) {
        (Some(parsed), _) => Some(parsed),
        (None, _) if !config.extensions.is_empty() => {
            Some(ExtensionFilter::from_lists(&config.extensions))
        }
        (None, Some(p)) => Some(p.ask_extensions()?),
        (None, None) => None,
    };

    let Some((filter, rejected)) = answer else {
        return Ok(ExtensionFilter::default());
    };

    if !rejected.is_empty() {
        if filter.is_empty() {
            sink.on_notice("No valid file types entered. Defaulting to all file types.");
        } else {
            sink.on_notice(&format!(
                "Ignoring invalid file types (must start with '.'): {}",
                rejected.join(", ")
            ));
        }
    }
    Ok(filter)
}

/// `--action` wins, then the interactive question.
fn choose_mode<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: Option<&mut Prompter<R, W>>,
    backup_dir: &Path,
    sink: &dyn DiagnosticsSink,
) -> io::Result<Option<RemediationMode>> {
    let mode = match (cli.action, prompter) {
        (Some(ActionArg::Delete), _) => Some(RemediationMode::PermanentDelete),
        (Some(ActionArg::Trash), _) => Some(RemediationMode::MoveToTrash),
        (Some(ActionArg::Backup), _) => {
            Some(RemediationMode::MoveToBackup(backup_dir.to_path_buf()))
        }
        (Some(ActionArg::None), _) => None,
        (None, Some(p)) => match p.ask_action()? {
            ActionChoice::Delete => Some(RemediationMode::PermanentDelete),
            ActionChoice::Trash => Some(RemediationMode::MoveToTrash),
            ActionChoice::Backup => {
                Some(RemediationMode::MoveToBackup(backup_dir.to_path_buf()))
            }
            ActionChoice::Invalid(answer) => {
                log::debug!("Unrecognised action answer: {answer:?}");
                sink.on_notice("Invalid option selected.");
                None
            }
        },
        (None, None) => {
            sink.on_notice("No action selected; duplicates were only listed.");
            None
        }
    };
    Ok(mode)
}
