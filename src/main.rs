use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use argh::FromArgs;
use myshell::{Config, FileRecorder, Interpreter, NullRecorder, Recorder};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A minimal interactive command interpreter with pipelines.
struct Args {
    #[argh(option)]
    /// configuration file to read instead of /etc/myshell and ~/.myshell_rc; may be repeated.
    config: Vec<PathBuf>,

    #[argh(option)]
    /// command log to append to instead of ~/.myshell.log.
    log_file: Option<PathBuf>,

    #[argh(switch)]
    /// skip the PreShellCommand entries of the configuration.
    no_startup: bool,

    #[argh(switch, short = 'v')]
    /// print debug diagnostics to standard error.
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn command_log(args: &Args) -> Box<dyn Recorder> {
    match args.log_file.clone().map(FileRecorder::new).or_else(FileRecorder::in_home) {
        Some(recorder) => {
            debug!(path = %recorder.path().display(), "command log");
            Box::new(recorder)
        }
        None => Box::new(NullRecorder),
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_tracing(args.verbose);
    info!("starting myshell v{}", env!("CARGO_PKG_VERSION"));

    let mut recorder = command_log(&args);
    let paths = if args.config.is_empty() {
        Config::default_paths()
    } else {
        args.config.clone()
    };
    let config = Config::load(&paths, recorder.as_mut());

    if let Some(prompt) = &config.prompt {
        println!("Custom Prompt: {prompt}");
    }
    if let Some(size) = config.input_size.filter(|&size| size != 0) {
        println!("Input size set to: {size}");
    }

    let mut shell = Interpreter::new(recorder).with_prompt(config.prompt.clone());
    if !args.no_startup {
        shell.run_startup_commands(&config.startup_commands);
    }
    if shell.should_exit() {
        process::exit(shell.exit_code());
    }

    println!("Welcome to myshell");
    let code = shell.repl().context("reading input")?;
    process::exit(code)
}
