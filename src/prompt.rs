//! Interactive questions asked on the terminal.
//!
//! [`Prompter`] is generic over its input and output so the same code serves
//! the terminal (`stdin`/`stdout`) and tests (`Cursor`/`Vec<u8>`).

use std::io::{self, BufRead, Write};

use crate::scanner::ExtensionFilter;

/// Prompt shown before the file-type filter is read.
pub const EXTENSIONS_PROMPT: &str = "Enter file types to scan for duplicates (comma-separated, e.g., .jpg,.png,.pdf) or leave blank for all: ";

/// Prompt shown before the action is read.
pub const ACTION_PROMPT: &str =
    "Do you want to (d)elete, (b)ackup, or (m)ove to trash? (d/b/m): ";

const INVALID_CONFIRMATION: &str = "Invalid response. Please answer with 'yes' or 'no'.";

/// Answer to [`ACTION_PROMPT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionChoice {
    /// `d`: permanent delete
    Delete,
    /// `b`: move to the backup folder
    Backup,
    /// `m`: move to trash
    Trash,
    /// Anything else, as typed (trimmed)
    Invalid(String),
}

impl ActionChoice {
    /// Interpret a raw answer.
    #[must_use]
    pub fn parse(answer: &str) -> Self {
        let answer = answer.trim().to_lowercase();
        match answer.as_str() {
            "d" => Self::Delete,
            "b" => Self::Backup,
            "m" => Self::Trash,
            _ => Self::Invalid(answer),
        }
    }
}

/// Something that can say yes or no to a question.
pub trait Confirmer {
    /// Ask `question`; `true` means go ahead.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Always confirms (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&mut self, question: &str) -> bool {
        log::debug!("Confirmation assumed: {}", question.trim());
        true
    }
}

/// Always declines (non-interactive without `--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeNo;

impl Confirmer for AssumeNo {
    fn confirm(&mut self, question: &str) -> bool {
        log::debug!("Confirmation declined without asking: {}", question.trim());
        false
    }
}

/// Line-oriented question asker.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process terminal.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for the file-type filter.
    ///
    /// Returns the parsed filter and the entries that were dropped because
    /// they do not start with `.`. A blank answer or end of input gives an
    /// empty (match-all) filter.
    ///
    /// # Errors
    ///
    /// Fails only if the terminal cannot be written or read.
    pub fn ask_extensions(&mut self) -> io::Result<(ExtensionFilter, Vec<String>)> {
        let answer = self.ask(EXTENSIONS_PROMPT)?.unwrap_or_default();
        Ok(ExtensionFilter::parse_with_rejects(&answer))
    }

    /// Ask which action to apply. End of input is an invalid (empty) choice.
    ///
    /// # Errors
    ///
    /// Fails only if the terminal cannot be written or read.
    pub fn ask_action(&mut self) -> io::Result<ActionChoice> {
        let answer = self.ask(ACTION_PROMPT)?.unwrap_or_default();
        Ok(ActionChoice::parse(&answer))
    }

    /// Yes/no question, repeated until the answer is recognised.
    ///
    /// Accepts `yes`, `y`, `no`, `n` in any case. End of input means no.
    ///
    /// # Errors
    ///
    /// Fails only if the terminal cannot be written or read.
    pub fn ask_yes_no(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let Some(answer) = self.ask(question)? else {
                writeln!(self.output)?;
                return Ok(false);
            };
            match answer.to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => {
                    log::info!("{INVALID_CONFIRMATION}");
                    writeln!(self.output, "{INVALID_CONFIRMATION}")?;
                }
            }
        }
    }

    /// Consume the prompter, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirmer for Prompter<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        match self.ask_yes_no(question) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("Could not read confirmation, treating as no: {e}");
                false
            }
        }
    }
}
