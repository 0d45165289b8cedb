//! A minimal interactive command interpreter.
//!
//! A command line is split into stages separated by `|` ([`parser`]), every
//! stage is started as a child process whose standard streams are chained
//! through anonymous pipes ([`executor`], [`supervisor`]), and the outcome of
//! the final stage is classified ([`Outcome`]) and written to a command log
//! ([`log`]). Startup directives come from `KEY=VALUE` files ([`config`]).
//!
//! The main entry point is [`Interpreter`], which also handles the `cd` and
//! `exit` builtins and hosts the interactive read loop.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
mod interpreter;
pub mod io_adapters;
pub mod log;
pub mod outcome;
pub mod parser;
pub mod supervisor;

pub use config::Config;
pub use env::Environment;
pub use error::{ConfigError, ParseError, SpawnError};
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
pub use log::{FileRecorder, MemoryRecorder, NullRecorder, Recorder};
pub use outcome::{Outcome, StageStatus};
pub use parser::{MAX_STAGES, Pipeline, Stage, tokenize};
