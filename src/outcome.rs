//! Classification of how a stage, and a whole pipeline, ended.

use std::fmt;
use std::process::ExitStatus;

use crate::command::{EXIT_NOT_FOUND, EXIT_SPAWN_FAILED, EXIT_USAGE, ExitCode};
use crate::error::ParseError;

/// How a single stage ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Exited(ExitCode),
    Signaled(i32),
    /// The program could not be located or executed; no process ran.
    NotFound,
    /// The child could not be reaped.
    WaitFailed(String),
}

impl From<ExitStatus> for StageStatus {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => StageStatus::Exited(code),
            None => terminated_by_signal(status),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> StageStatus {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => StageStatus::Signaled(signal),
        None => StageStatus::WaitFailed(format!("unrecognised wait status {status:?}")),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(status: ExitStatus) -> StageStatus {
    StageStatus::WaitFailed(format!("unrecognised wait status {status:?}"))
}

/// The result of one pipeline invocation, reported to the command log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NonZeroExit(ExitCode),
    SignalTerminated(i32),
    ProgramNotFound(String),
    SpawnFailed(String),
    /// The line was malformed; no process was created.
    Rejected(ParseError),
}

impl Outcome {
    /// Outcome of a pipeline whose final stage, running `program`, ended with `status`.
    pub fn from_status(program: &str, status: StageStatus) -> Self {
        match status {
            StageStatus::Exited(0) => Outcome::Success,
            StageStatus::Exited(code) => Outcome::NonZeroExit(code),
            StageStatus::Signaled(signal) => Outcome::SignalTerminated(signal),
            StageStatus::NotFound => Outcome::ProgramNotFound(program.to_owned()),
            StageStatus::WaitFailed(reason) => Outcome::SpawnFailed(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Shell-style exit code: 128 + signal for signals, 127 for a missing program.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Outcome::Success => 0,
            Outcome::NonZeroExit(code) => *code,
            Outcome::SignalTerminated(signal) => 128 + signal,
            Outcome::ProgramNotFound(_) => EXIT_NOT_FOUND,
            Outcome::SpawnFailed(_) => EXIT_SPAWN_FAILED,
            Outcome::Rejected(_) => EXIT_USAGE,
        }
    }

    /// Status text for the command log.
    pub fn log_status(&self) -> String {
        match self {
            Outcome::Success => "success".to_owned(),
            Outcome::NonZeroExit(_) | Outcome::SignalTerminated(_) | Outcome::ProgramNotFound(_) => {
                "failed".to_owned()
            }
            Outcome::SpawnFailed(reason) => format!("failed: {reason}"),
            Outcome::Rejected(err) => format!("failed: {err}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::NonZeroExit(code) => write!(f, "exited with status {code}"),
            Outcome::SignalTerminated(signal) => write!(f, "terminated by signal {signal}"),
            Outcome::ProgramNotFound(program) => write!(f, "command not found: {program}"),
            Outcome::SpawnFailed(reason) => write!(f, "spawn failed: {reason}"),
            Outcome::Rejected(err) => write!(f, "{err}"),
        }
    }
}
