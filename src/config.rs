//! Startup directives read from `KEY=VALUE` files.
//!
//! Two files are read in order, the system-wide `/etc/myshell` and then
//! `$HOME/.myshell_rc`. Later files override `CustomPrompt` and `InputSize`
//! and append to the startup commands. Problems never abort loading: they are
//! written to the command log and the rest of the file is still applied.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::log::Recorder;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/myshell";
pub const USER_CONFIG_FILE_NAME: &str = ".myshell_rc";

/// Upper bound on the number of `PreShellCommand` entries.
pub const MAX_STARTUP_COMMANDS: usize = 10;

const KEY_PROMPT: &str = "CustomPrompt";
const KEY_INPUT_SIZE: &str = "InputSize";
const KEY_STARTUP_PREFIX: &str = "PreShellCommand";

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<key>[^=]*?)\s*=\s*(?P<value>.*?)\s*$").expect("valid config regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub prompt: Option<String>,
    /// Informational only; input is never truncated to it.
    pub input_size: Option<usize>,
    pub startup_commands: Vec<String>,
}

impl Config {
    /// Default file locations: system file first, then the user's.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load `paths` in order, reporting every problem to `recorder`.
    pub fn load(paths: &[PathBuf], recorder: &mut dyn Recorder) -> Self {
        let mut config = Config::default();
        for path in paths {
            for problem in config.apply_file(path) {
                warn!("{problem}");
                let subject = match &problem {
                    ConfigError::TooManyStartupCommands { command, .. } => command.clone(),
                    _ => path.display().to_string(),
                };
                recorder.record(&subject, problem.log_status());
            }
        }
        config
    }

    /// Apply one file, returning the problems found in it.
    pub fn apply_file(&mut self, path: &Path) -> Vec<ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => self.apply_str(path, &content),
            Err(source) => vec![ConfigError::Read {
                path: path.to_owned(),
                source,
            }],
        }
    }

    /// Apply configuration text; `path` is only used in error reports.
    pub fn apply_str(&mut self, path: &Path, content: &str) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if let Err(problem) = self.apply_line(path, index + 1, line) {
                problems.push(problem);
            }
        }
        problems
    }

    fn apply_line(&mut self, path: &Path, line_no: usize, line: &str) -> Result<(), ConfigError> {
        let syntax_error = || ConfigError::Syntax {
            path: path.to_owned(),
            line: line_no,
        };
        let caps = ENTRY.captures(line).ok_or_else(syntax_error)?;
        let (key, value) = (&caps["key"], &caps["value"]);
        if key.is_empty() || value.is_empty() {
            return Err(syntax_error());
        }

        if key == KEY_PROMPT {
            self.prompt = Some(value.to_owned());
        } else if key == KEY_INPUT_SIZE {
            let size = value.parse().map_err(|_| ConfigError::InvalidInputSize {
                path: path.to_owned(),
                value: value.to_owned(),
            })?;
            self.input_size = Some(size);
        } else if key.starts_with(KEY_STARTUP_PREFIX) {
            self.push_startup_command(value)?;
        } else {
            debug!(key, path = %path.display(), "ignoring unknown configuration key");
        }
        Ok(())
    }

    /// Append a startup command, refusing to go past [`MAX_STARTUP_COMMANDS`].
    pub fn push_startup_command(&mut self, command: &str) -> Result<(), ConfigError> {
        if self.startup_commands.len() >= MAX_STARTUP_COMMANDS {
            return Err(ConfigError::TooManyStartupCommands {
                command: command.to_owned(),
                max: MAX_STARTUP_COMMANDS,
            });
        }
        self.startup_commands.push(command.to_owned());
        Ok(())
    }
}
