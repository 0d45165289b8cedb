//! Turns a command line into a [`Pipeline`] of [`Stage`]s.
//!
//! The grammar is deliberately tiny: `|` separates stages and runs of
//! whitespace separate tokens. There is no quoting, escaping or substitution,
//! so a token is exactly a maximal run of characters that are neither
//! whitespace nor `|`.

use std::fmt;

use crate::error::ParseError;

/// Upper bound on the number of stages of a single pipeline.
pub const MAX_STAGES: usize = 20;

/// One program invocation within a pipeline.
///
/// Always holds at least one token: the program name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    tokens: Vec<String>,
}

impl Stage {
    /// Build a stage from its tokens, returning `None` when there are none.
    pub fn new(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    /// Name of the program to execute (`argv[0]`).
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Arguments following the program name.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// The full argument vector, program name included.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// An ordered, non-empty chain of stages connected by anonymous pipes.
///
/// Displays in normalized form: tokens joined by a single space and stages
/// joined by `" | "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`; a pipeline holds at least one stage.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stage whose exit status decides the outcome of the pipeline.
    pub fn last(&self) -> &Stage {
        &self.stages[self.stages.len() - 1]
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

/// Split `line` into pipeline stages and each stage into tokens.
///
/// The caller is expected to pass an already trimmed line; trimming again is
/// harmless. Any segment without tokens, including the whole line being blank,
/// fails with [`ParseError::EmptyStage`] before anything else happens.
pub fn tokenize(line: &str) -> Result<Pipeline, ParseError> {
    let segments: Vec<&str> = line.trim().split('|').collect();
    if segments.len() > MAX_STAGES {
        return Err(ParseError::TooManyStages {
            count: segments.len(),
            max: MAX_STAGES,
        });
    }

    let stages = segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            let tokens = segment
                .trim()
                .split_whitespace()
                .map(str::to_owned)
                .collect();
            Stage::new(tokens).ok_or(ParseError::EmptyStage { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pipeline { stages })
}
