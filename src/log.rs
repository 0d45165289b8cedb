//! The command log: one line per executed command line.
//!
//! Lines have the form
//! `[2024-01-31 12:00:00] Command executed: ls | wc, Status: success`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

/// File name of the command log inside the home directory.
pub const LOG_FILE_NAME: &str = ".myshell.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for command outcomes.
pub trait Recorder {
    /// Record that `command` finished with `status`.
    fn record(&mut self, command: &str, status: &str);
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn record(&mut self, command: &str, status: &str) {
        (**self).record(command, status);
    }
}

/// Appends timestamped entries to a log file.
///
/// The file is opened for every entry, so it may be rotated or removed while
/// the interpreter runs.
#[derive(Debug, Clone)]
pub struct FileRecorder {
    path: PathBuf,
}

impl FileRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file in the user's home directory, if there is one.
    pub fn in_home() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(LOG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl Recorder for FileRecorder {
    fn record(&mut self, command: &str, status: &str) {
        let line = format_entry(&Local::now().format(TIMESTAMP_FORMAT).to_string(), command, status);
        if let Err(err) = self.append(&line) {
            eprintln!("myshell: failed to open log file: {err}");
        }
    }
}

/// Keeps entries in memory; handy for tests and for embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub entries: Vec<(String, String)>,
}

impl Recorder for MemoryRecorder {
    fn record(&mut self, command: &str, status: &str) {
        self.entries.push((command.to_owned(), status.to_owned()));
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(&mut self, _command: &str, _status: &str) {}
}

fn format_entry(timestamp: &str, command: &str, status: &str) -> String {
    format!("[{timestamp}] Command executed: {command}, Status: {status}\n")
}
