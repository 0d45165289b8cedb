use crate::builtin;
use crate::command::{ExitCode, Stdin, Stdout};
use crate::env::Environment;
use crate::executor;
use crate::io_adapters::InheritedStdin;
use crate::log::Recorder;
use crate::outcome::Outcome;
use crate::parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::debug;

/// Prompt shown when no `CustomPrompt` is configured.
pub const DEFAULT_PROMPT: &str = ">";

/// A minimal interactive command interpreter.
///
/// The interpreter owns the [`Environment`] every child is started in and a
/// [`Recorder`] that receives one entry per executed pipeline.
///
/// Example
/// ```
/// use myshell::{Interpreter, MemoryRecorder, Outcome};
/// let mut sh = Interpreter::new(MemoryRecorder::default());
/// let outcome = sh.parse_and_run("true");
/// assert_eq!(outcome, Outcome::Success);
/// assert_eq!(sh.recorder().entries.len(), 1);
/// ```
pub struct Interpreter<R: Recorder> {
    env: Environment,
    recorder: R,
    prompt: String,
}

impl<R: Recorder> Interpreter<R> {
    pub fn new(recorder: R) -> Self {
        Self::with_environment(Environment::new(), recorder)
    }

    pub fn with_environment(env: Environment, recorder: R) -> Self {
        Self {
            env,
            recorder,
            prompt: DEFAULT_PROMPT.to_owned(),
        }
    }

    /// Use `prompt` instead of [`DEFAULT_PROMPT`]; a space is appended when shown.
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        if let Some(prompt) = prompt {
            self.prompt = prompt;
        }
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn prompt(&self) -> String {
        format!("{} ", self.prompt)
    }

    /// Parse and run a line that is known not to be a builtin.
    ///
    /// The first stage reads the interpreter's standard input and the last one
    /// writes its standard output. The outcome is recorded exactly once.
    pub fn parse_and_run(&mut self, raw_line: &str) -> Outcome {
        self.parse_and_run_with(
            raw_line,
            Box::new(InheritedStdin),
            Box::new(std::io::stdout()),
        )
    }

    /// Like [`Interpreter::parse_and_run`], with explicit streams for the
    /// first and last stage.
    pub fn parse_and_run_with(
        &mut self,
        raw_line: &str,
        stdin: Box<dyn Stdin>,
        stdout: Box<dyn Stdout>,
    ) -> Outcome {
        let line = raw_line.trim();
        let outcome = match parser::tokenize(line) {
            Ok(pipeline) => {
                // Flush anything buffered before the children start writing.
                if let Err(err) = std::io::stdout().flush() {
                    debug!(%err, "failed to flush stdout");
                }
                executor::run(&pipeline, &self.env, stdin, stdout)
            }
            Err(err) => {
                eprintln!("myshell: {err}");
                Outcome::Rejected(err)
            }
        };
        debug!(line, %outcome, "command finished");
        self.recorder.record(line, &outcome.log_status());
        outcome
    }

    /// Execute one line as typed by the user.
    ///
    /// Blank lines do nothing. A single-stage line naming `cd` or `exit` runs
    /// as a builtin and is not recorded. Anything else goes through
    /// [`Interpreter::parse_and_run`]. Returns the outcome of the pipeline, if
    /// one ran.
    pub fn execute_line(&mut self, raw_line: &str) -> Option<Outcome> {
        let line = raw_line.trim();
        if line.is_empty() {
            return None;
        }
        if let Ok(pipeline) = parser::tokenize(line) {
            if pipeline.len() == 1 && builtin::is_builtin(pipeline.last().program()) {
                let code = builtin::dispatch(pipeline.last(), &mut std::io::stdout(), &mut self.env);
                debug!(line, ?code, "builtin finished");
                return None;
            }
        }
        Some(self.parse_and_run(line))
    }

    /// Run the configured startup commands in order, stopping early on `exit`.
    pub fn run_startup_commands(&mut self, commands: &[String]) {
        for command in commands {
            if self.env.should_exit {
                break;
            }
            self.execute_line(command);
        }
    }

    /// Whether a builtin has asked the interpreter to stop.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    pub fn exit_code(&self) -> ExitCode {
        self.env.exit_code
    }

    /// Interactive read loop.
    ///
    /// Runs until `exit` or end of input and returns the status the process
    /// should exit with. Ctrl-C abandons the current line.
    pub fn repl(&mut self) -> rustyline::Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.execute_line(&line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(self.env.exit_code)
    }
}
