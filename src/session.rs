//! Line-oriented command loop on top of a [`DirectoryMonitor`].
//!
//! One command per line. Tokens are split shell-style, so
//! `info "my notes.txt"` looks up a file name containing a space.

use crate::clock::{Clock, SystemClock};
use crate::monitor::{DirectoryMonitor, FileStatus};
use crate::utils::formatters::TimestampFormat;
use anyhow::{Context, Result};
use colored::{Color, Colorize};
use std::io::{BufRead, Write};
use tracing::{Level, debug, span};

/// Prompt printed before each command is read.
pub const PROMPT: &str = "Enter command (commit, status, info [filename], exit): ";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the snapshot time to now
    Commit,
    /// Run a diff pass and print the changes
    Status,
    /// Print the report of a tracked file; `None` when the name is missing
    Info(Option<String>),
    /// Leave the loop
    Exit,
    /// Blank line
    Empty,
    /// Anything else, with the word that was typed
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    ///
    /// Lines with unbalanced quotes fall back to plain whitespace splitting.
    /// A command given more arguments than it takes is unknown.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let tokens = shell_words::split(line).unwrap_or_else(|e| {
            debug!(error = %e, "falling back to whitespace split");
            line.split_whitespace().map(str::to_owned).collect()
        });

        let mut tokens = tokens.into_iter();
        let Some(word) = tokens.next() else {
            return Self::Empty;
        };
        let mut args: Vec<String> = tokens.collect();

        match (word.as_str(), args.len()) {
            ("commit", 0) => Self::Commit,
            ("status", 0) => Self::Status,
            ("info", 0) => Self::Info(None),
            ("info", 1) => Self::Info(args.pop()),
            ("exit", 0) => Self::Exit,
            _ => Self::Unknown(word),
        }
    }
}

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// Stop reading
    Exit,
}

/// Interactive session state
#[derive(Debug)]
pub struct Session<C = SystemClock> {
    monitor: DirectoryMonitor<C>,
    prompt: bool,
    color: bool,
    timestamp_format: TimestampFormat,
}

impl<C: Clock> Session<C> {
    /// Wraps an initialized monitor. Prompt and color are on by default.
    #[must_use]
    pub fn new(monitor: DirectoryMonitor<C>) -> Self {
        Self {
            monitor,
            prompt: true,
            color: true,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Print the prompt before each command
    #[must_use]
    pub const fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Colorize status lines
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// How report timestamps are rendered
    #[must_use]
    pub const fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// The wrapped monitor
    #[must_use]
    pub const fn monitor(&self) -> &DirectoryMonitor<C> {
        &self.monitor
    }

    /// Reads commands from `input` until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a line or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        let span = span!(Level::DEBUG, "session", root = %self.monitor.root().display());
        let _guard = span.enter();

        let mut buf = Vec::new();
        loop {
            if self.prompt {
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }

            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("Failed to read command")?;
            if read == 0 {
                debug!("end of input");
                break;
            }

            // Invalid UTF-8 cannot name a command; it parses as unknown
            let line = String::from_utf8_lossy(&buf);
            let command = Command::parse(&line);
            if self.execute(&command, &mut out)? == Flow::Exit {
                break;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Executes one command, writing its output to `out`.
    ///
    /// Malformed commands only print a message. A failed diff pass is
    /// printed as an error and leaves the tracked set unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<Flow> {
        debug!(?command, "executing");

        match command {
            Command::Commit => {
                self.monitor.commit();
                writeln!(out, "{}", self.paint("Snapshot updated.", Color::Green))?;
            }
            Command::Status => self.print_status(out)?,
            Command::Info(Some(filename)) => match self.monitor.info(filename) {
                Some(record) => write!(out, "{}", record.describe(self.timestamp_format))?,
                None => writeln!(out, "File not found: {filename}")?,
            },
            Command::Info(None) => writeln!(out, "Usage: info <filename>")?,
            Command::Exit => return Ok(Flow::Exit),
            Command::Empty => {}
            Command::Unknown(_) => writeln!(out, "Unknown command.")?,
        }

        Ok(Flow::Continue)
    }

    fn print_status<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let report = match self.monitor.status() {
            Ok(report) => report,
            Err(e) => {
                writeln!(out, "{}", self.paint(&format!("Error: {e}"), Color::Red))?;
                return Ok(());
            }
        };

        for change in &report.changes {
            let color = match change {
                FileStatus::Added(_) => Color::Green,
                FileStatus::Modified(_) => Color::Yellow,
                FileStatus::Deleted(_) => Color::Red,
            };
            writeln!(out, "{}", self.paint(&change.message(), color))?;
        }

        for error in &report.errors {
            writeln!(out, "{}", self.paint(&format!("Error: {error}"), Color::Red))?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_owned()
        }
    }
}
