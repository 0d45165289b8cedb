use crate::command::ExitCode;
use crate::env::Environment;
use crate::parser::Stage;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Commands handled by the interpreter itself, without spawning a process.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`). They change the
/// interpreter's own state, which is why they cannot run as a child.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Executes the command against the interpreter environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Run `stage` as builtin `T` if its program name matches.
///
/// Errors are printed to `stdout` and turned into status 1, argument errors
/// and `--help` print argh's output.
fn try_run<T: BuiltinCommand>(
    stage: &Stage,
    stdout: &mut dyn Write,
    env: &mut Environment,
) -> Option<ExitCode> {
    if stage.program() != T::name() {
        return None;
    }
    let args: Vec<&str> = stage.args().iter().map(String::as_str).collect();
    let code = match T::from_args(&[T::name()], &args) {
        Ok(cmd) => match cmd.execute(stdout, env) {
            Ok(code) => code,
            Err(e) => {
                report(stdout, &format!("myshell: {e:#}"));
                1
            }
        },
        Err(EarlyExit { output, status }) => {
            report(stdout, output.trim_end());
            if status.is_err() { 1 } else { 0 }
        }
    };
    Some(code)
}

fn report(stdout: &mut dyn Write, message: &str) {
    if let Err(err) = writeln!(stdout, "{message}") {
        debug!(%err, "failed to write builtin output");
    }
}

/// Run `stage` if it names a builtin, returning its exit code.
///
/// Returns `None` for anything that must be executed as an external program.
pub fn dispatch(stage: &Stage, stdout: &mut dyn Write, env: &mut Environment) -> Option<ExitCode> {
    try_run::<Cd>(stage, stdout, env).or_else(|| try_run::<Exit>(stage, stdout, env))
}

/// Whether `name` is handled by [`dispatch`].
pub fn is_builtin(name: &str) -> bool {
    name == Cd::name() || name == Exit::name()
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the home directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to the home directory when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => dirs::home_dir().context("cd: no target and no home directory")?,
        };

        let new_dir = env.current_dir.join(target);
        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: {}", new_dir.display()))?;
        if !canonical.is_dir() {
            anyhow::bail!("cd: {}: not a directory", canonical.display());
        }
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional)]
    /// status to exit with, 0 when omitted.
    pub code: Option<ExitCode>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let code = self.code.unwrap_or(0);
        env.request_exit(code);
        Ok(code)
    }
}
