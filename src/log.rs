//! Request activity logging
//!
//! Two sinks, both optional: styled status lines on stdout (verbose mode) and
//! an append-only file of timestamped entries. The executors receive an
//! [`ActivityLog`] rather than printing on their own.

use crate::error::{FrameworkError, Result};
use console::style;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Time-ordered identifier assigned to every dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Allocate a fresh id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Leading hex digits are the timestamp; the tail is random
        let id = self.0.simple().to_string();
        f.write_str(&id[id.len() - 8..])
    }
}

/// Severity marker for an activity line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Work started
    Progress,
    /// Work finished successfully
    Success,
    /// Something the user should notice
    Warning,
    /// Work failed
    Failure,
}

impl Mark {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Progress => "→",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Failure => "✗",
        }
    }

    fn styled(self) -> String {
        let symbol = self.symbol();
        match self {
            Self::Progress => style(symbol).cyan().to_string(),
            Self::Success => style(symbol).green().to_string(),
            Self::Warning => style(symbol).yellow().to_string(),
            Self::Failure => style(symbol).red().to_string(),
        }
    }
}

/// Where request activity goes
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    file: Option<PathBuf>,
    echo: bool,
}

impl ActivityLog {
    /// Log that records nothing
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Append entries to `path`
    #[must_use]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            echo: false,
        }
    }

    /// Also print styled status lines to stdout
    #[must_use]
    pub const fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Log file, if any
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Record one event for `id`
    ///
    /// Write failures are reported on stdout when echoing and otherwise
    /// dropped; a request never fails because its log could not be written.
    #[allow(clippy::print_stdout)] // echo is the verbose console output
    pub fn record(&self, id: RequestId, mark: Mark, message: &str) {
        if self.echo {
            println!("{} [{}] {}", mark.styled(), style(id).dim(), message);
        }

        if let Some(path) = &self.file {
            let entry = format!("{} [{id}] {message}", mark.symbol());
            if let Err(e) = log_message(path, &entry) {
                if self.echo {
                    println!("{} {e}", Mark::Warning.styled());
                }
            }
        }
    }
}

/// Append a timestamped line to `log_file`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be opened for appending.
pub fn log_message(log_file: &Path, message: &str) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| FrameworkError::DirError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
    }

    let log_entry = format!("[{}] {}\n", now_timestamp(), message);

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| FrameworkError::Internal(format!("{}: {e}", log_file.display())))?;

    file.write_all(log_entry.as_bytes())
        .map_err(|e| FrameworkError::Internal(format!("{}: {e}", log_file.display())))
}

/// Get current timestamp for logging
fn now_timestamp() -> String {
    use chrono::Local;
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
