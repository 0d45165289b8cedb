//! Per-stage process creation and reaping.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::debug;

use crate::env::Environment;
use crate::error::SpawnError;
use crate::outcome::StageStatus;
use crate::parser::Stage;

/// A stage that has been launched, or that failed to launch because its
/// program does not exist.
#[derive(Debug)]
pub struct ProcessHandle {
    program: String,
    child: Option<Child>,
}

impl ProcessHandle {
    fn missing(program: &str) -> Self {
        eprintln!("myshell: command not found: {program}");
        Self::unlaunched(program)
    }

    fn not_executable(program: &str, err: &io::Error) -> Self {
        eprintln!("myshell: cannot execute: {program}: {err}");
        Self::unlaunched(program)
    }

    fn unlaunched(program: &str) -> Self {
        Self {
            program: program.to_owned(),
            child: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// OS process id, `None` for a stage whose program was not found.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Take the read end of the pipe the child writes its output into.
    ///
    /// Only present when the stage was spawned with [`Stdio::piped`] output.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.as_mut()?.stdout.take()
    }

    /// Block until the process terminates.
    pub fn wait(self) -> StageStatus {
        let Some(mut child) = self.child else {
            return StageStatus::NotFound;
        };
        match child.wait() {
            Ok(status) => {
                debug!(pid = child.id(), program = %self.program, ?status, "stage finished");
                status.into()
            }
            Err(err) => StageStatus::WaitFailed(err.to_string()),
        }
    }
}

/// Launch `stage` with its standard streams bound to `input` and `output`.
///
/// Both handles are consumed: by the time this returns, the parent no longer
/// holds the descriptors it passed in. A program that cannot be located or
/// executed yields a handle in the missing state after a diagnostic has been
/// printed; only a failure of process creation itself, or a working directory
/// that no longer exists, is an error.
pub fn spawn(
    stage: &Stage,
    input: Stdio,
    output: Stdio,
    env: &Environment,
) -> Result<ProcessHandle, SpawnError> {
    // The child's chdir failing would otherwise surface as NotFound.
    if !env.current_dir.is_dir() {
        return Err(SpawnError::WorkingDirectory {
            path: env.current_dir.clone(),
        });
    }

    let search_path = env.search_path();
    let Some(executable) =
        resolve_program(stage.program(), search_path.as_deref(), &env.current_dir)
    else {
        return Ok(ProcessHandle::missing(stage.program()));
    };

    let mut command = Command::new(&executable);
    set_arg0(&mut command, stage.program());
    command
        .args(stage.args())
        .stdin(input)
        .stdout(output)
        .current_dir(&env.current_dir);

    match command.spawn() {
        Ok(child) => {
            debug!(pid = child.id(), executable = %executable.display(), "spawned stage");
            Ok(ProcessHandle {
                program: stage.program().to_owned(),
                child: Some(child),
            })
        }
        Err(err) if is_not_executable(&err) => {
            Ok(ProcessHandle::not_executable(stage.program(), &err))
        }
        Err(source) => Err(SpawnError::Spawn {
            program: stage.program().to_owned(),
            source,
        }),
    }
}

#[cfg(unix)]
fn set_arg0(command: &mut Command, program: &str) {
    use std::os::unix::process::CommandExt;
    command.arg0(program);
}

#[cfg(not(unix))]
fn set_arg0(_command: &mut Command, _program: &str) {}

/// `ENOEXEC` has the same value on Linux, the BSDs and macOS.
#[cfg(unix)]
const ENOEXEC: i32 = 8;

/// The program exists but the OS refused to run it, as opposed to process
/// creation failing for lack of resources.
fn is_not_executable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || is_exec_format_error(err)
}

#[cfg(unix)]
fn is_exec_format_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ENOEXEC)
}

#[cfg(not(unix))]
fn is_exec_format_error(_err: &io::Error) -> bool {
    false
}

/// Locate the executable a stage names.
///
/// - Empty name: `None`.
/// - Name containing a path separator (`/bin/ls`, `./run`, `bin/tool`):
///   absolute paths are used as is, relative ones are taken relative to `cwd`.
/// - Bare name: each directory of `search_path` is tried in order; relative
///   entries are themselves taken relative to `cwd`.
///
/// A candidate only matches if it is a regular file that is executable.
pub fn resolve_program(name: &str, search_path: Option<&OsStr>, cwd: &Path) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let path = Path::new(name);
    if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
        let candidate = cwd.join(path);
        return is_executable(&candidate).then_some(candidate);
    }

    std::env::split_paths(search_path?)
        .map(|dir| cwd.join(dir).join(path))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
