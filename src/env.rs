use std::env as stdenv;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::command::ExitCode;

/// Interpreter-owned process state.
///
/// The environment contains:
/// - `current_dir`: the working directory every spawned child starts in.
///   Only the `cd` built-in changes it, and never while a pipeline runs.
/// - `should_exit`: set by the `exit` built-in, checked by the read loop.
/// - `exit_code`: the status the interpreter terminates with.
#[derive(Debug, Clone)]
pub struct Environment {
    pub current_dir: PathBuf,
    pub should_exit: bool,
    pub exit_code: ExitCode,
}

impl Environment {
    /// Capture the current working directory of the process.
    ///
    /// Falls back to `.` when the directory cannot be determined (for example
    /// when it has been removed).
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_dir(current_dir)
    }

    pub fn with_dir(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            should_exit: false,
            exit_code: 0,
        }
    }

    /// Directories searched for bare program names.
    pub fn search_path(&self) -> Option<OsString> {
        stdenv::var_os("PATH")
    }

    /// Request the interpreter to stop with `code`.
    pub fn request_exit(&mut self, code: ExitCode) {
        self.should_exit = true;
        self.exit_code = code;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_captures_current_dir() {
        let env = Environment::new();
        assert_eq!(env.current_dir, stdenv::current_dir().unwrap());
        assert!(!env.should_exit);
    }

    #[test]
    fn test_env_request_exit() {
        let mut env = Environment::with_dir("/");
        env.request_exit(3);
        assert!(env.should_exit);
        assert_eq!(env.exit_code, 3);
    }

    #[test]
    fn test_env_reads_search_path() {
        let env = Environment::new();
        assert!(env.search_path().is_some());
    }
}
