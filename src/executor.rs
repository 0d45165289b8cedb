//! Wiring and running a [`Pipeline`].
//!
//! Stage `i` writes into an anonymous pipe whose read end becomes the standard
//! input of stage `i + 1`. The pipe for a boundary is created when its writer
//! is spawned, so it always exists before the reader needs it. Each pipe end
//! moves into exactly one child: the write end is released by the parent as
//! soon as stage `i` has been spawned, and the read end as soon as stage
//! `i + 1` has been spawned. Nothing else holds a copy, so a reader sees
//! end-of-file exactly when its writer exits.

use std::process::Stdio;

use tracing::debug;

use crate::command::{Stdin, Stdout};
use crate::env::Environment;
use crate::error::SpawnError;
use crate::outcome::{Outcome, StageStatus};
use crate::parser::Pipeline;
use crate::supervisor::{self, ProcessHandle};

/// All processes of a pipeline, in stage order.
#[derive(Debug)]
pub struct RunningPipeline {
    handles: Vec<ProcessHandle>,
}

impl RunningPipeline {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reap every stage and return their statuses in stage order.
    ///
    /// Stages may finish in any order; each one is waited for regardless of
    /// how the others ended.
    pub fn wait(self) -> Vec<StageStatus> {
        self.handles.into_iter().map(ProcessHandle::wait).collect()
    }
}

/// Spawn every stage of `pipeline`.
///
/// The first stage reads `stdin`, the last one writes `stdout`. If process
/// creation fails part way, the stages already running are reaped before the
/// error is returned; their pipes have been closed, so they see end-of-file or
/// a broken pipe and terminate.
pub fn spawn_pipeline(
    pipeline: &Pipeline,
    env: &Environment,
    stdin: Box<dyn Stdin>,
    stdout: Box<dyn Stdout>,
) -> Result<RunningPipeline, SpawnError> {
    let stages = pipeline.stages();
    let mut handles = Vec::with_capacity(stages.len());
    let mut input = stdin.stdio();
    let mut output = Some(stdout.stdio());

    for (i, stage) in stages.iter().enumerate() {
        let is_last = i + 1 == stages.len();
        let stage_output = if is_last {
            output.take().unwrap_or_else(Stdio::null)
        } else {
            Stdio::piped()
        };
        let stage_input = std::mem::replace(&mut input, Stdio::null());

        let mut handle = match supervisor::spawn(stage, stage_input, stage_output, env) {
            Ok(handle) => handle,
            Err(err) => {
                debug!(stage = i, %err, "aborting pipeline");
                let _ = RunningPipeline { handles }.wait();
                return Err(err);
            }
        };

        // A missing program leaves the next stage reading an empty stream.
        if let Some(read_end) = handle.take_stdout() {
            input = Stdio::from(read_end);
        }
        handles.push(handle);
    }

    Ok(RunningPipeline { handles })
}

/// Run `pipeline` to completion.
///
/// The outcome reflects the final stage only; the statuses of upstream stages
/// are collected and then discarded. Use [`spawn_pipeline`] directly to see
/// every status.
pub fn run(
    pipeline: &Pipeline,
    env: &Environment,
    stdin: Box<dyn Stdin>,
    stdout: Box<dyn Stdout>,
) -> Outcome {
    let running = match spawn_pipeline(pipeline, env, stdin, stdout) {
        Ok(running) => running,
        Err(err) => return Outcome::SpawnFailed(err.to_string()),
    };

    let statuses = running.wait();
    debug!(?statuses, "pipeline finished");
    match statuses.into_iter().last() {
        Some(status) => Outcome::from_status(pipeline.last().program(), status),
        None => Outcome::SpawnFailed("pipeline produced no processes".to_owned()),
    }
}
