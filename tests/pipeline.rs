#![cfg(unix)]

use std::fs;
use std::io::{Read, pipe};
use std::os::unix::fs::PermissionsExt;

use myshell::executor::spawn_pipeline;
use myshell::io_adapters::NullStdin;
use myshell::{Environment, Interpreter, MemoryRecorder, Outcome, ParseError, StageStatus, tokenize};

fn run_line(sh: &mut Interpreter<MemoryRecorder>, line: &str) -> (Outcome, String) {
    let (mut reader, writer) = pipe().unwrap();
    let outcome = sh.parse_and_run_with(line, Box::new(NullStdin), Box::new(writer));
    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    (outcome, out)
}

#[test]
fn echo_writes_exactly_its_argument() {
    let mut sh = Interpreter::new(MemoryRecorder::default());
    assert_eq!(run_line(&mut sh, "echo hello"), (Outcome::Success, "hello\n".to_string()));
}

#[test]
fn word_count_through_a_pipe() {
    let mut sh = Interpreter::new(MemoryRecorder::default());
    let (outcome, out) = run_line(&mut sh, "echo hello | wc -w");
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(out.trim_start(), "1\n");
}

#[test]
fn missing_program_is_not_fatal() {
    let mut sh = Interpreter::new(MemoryRecorder::default());
    let (outcome, _) = run_line(&mut sh, "nosuchprogram123");
    assert_eq!(outcome, Outcome::ProgramNotFound("nosuchprogram123".to_string()));
    assert_ne!(outcome.exit_code(), 0);

    let (outcome, out) = run_line(&mut sh, "echo next");
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(out, "next\n");
}

#[test]
fn unexecutable_stage_feeds_eof_downstream() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("noshebang");
    fs::write(&script, "echo hi\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let line = format!("echo x | {} | wc -c", script.display());
    let pipeline = tokenize(&line).unwrap();
    let (mut reader, writer) = pipe().unwrap();
    let running =
        spawn_pipeline(&pipeline, &Environment::new(), Box::new(NullStdin), Box::new(writer))
            .unwrap();
    assert_eq!(running.len(), 3);
    assert_eq!(
        running.wait(),
        vec![StageStatus::Exited(0), StageStatus::NotFound, StageStatus::Exited(0)]
    );
    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    assert_eq!(out.trim(), "0");

    let mut sh = Interpreter::new(MemoryRecorder::default());
    let (outcome, _) = run_line(&mut sh, &format!("echo x | {}", script.display()));
    assert_eq!(outcome, Outcome::ProgramNotFound(script.display().to_string()));
    assert_eq!(sh.recorder().entries[0].1, "failed");
}

#[test]
fn removed_working_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("gone");
    fs::create_dir(&sub).unwrap();
    let mut sh = Interpreter::with_environment(Environment::with_dir(&sub), MemoryRecorder::default());
    fs::remove_dir(&sub).unwrap();

    let (outcome, out) = run_line(&mut sh, "echo hi");
    assert!(out.is_empty());
    match outcome {
        Outcome::SpawnFailed(reason) => {
            assert!(reason.contains("working directory"), "{reason}");
            assert!(reason.contains("gone"), "{reason}");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn empty_stage_spawns_nothing() {
    let mut sh = Interpreter::new(MemoryRecorder::default());
    let (outcome, out) = run_line(&mut sh, "echo a | | echo b");
    assert_eq!(outcome, Outcome::Rejected(ParseError::EmptyStage { index: 1 }));
    assert!(out.is_empty());
    assert_eq!(sh.recorder().entries.len(), 1);
}

#[test]
fn signal_termination_is_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("kill_self.sh");
    fs::write(&script, "kill -9 $$\n").unwrap();

    let mut sh = Interpreter::new(MemoryRecorder::default());
    let (outcome, _) = run_line(&mut sh, &format!("sh {}", script.display()));
    assert_eq!(outcome, Outcome::SignalTerminated(9));
    assert_eq!(outcome.exit_code(), 137);
}

#[test]
fn every_stage_is_reaped() {
    for n in 1..=8 {
        let line = std::iter::once("echo x")
            .chain(std::iter::repeat_n("cat", n - 1))
            .collect::<Vec<_>>()
            .join(" | ");
        let pipeline = tokenize(&line).unwrap();
        let (mut reader, writer) = pipe().unwrap();
        let running =
            spawn_pipeline(&pipeline, &Environment::new(), Box::new(NullStdin), Box::new(writer))
                .unwrap();
        assert_eq!(running.len(), n);
        let statuses = running.wait();
        assert_eq!(statuses, vec![StageStatus::Exited(0); n]);

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "x\n");
    }
}

#[test]
fn large_output_does_not_deadlock() {
    let pipeline = tokenize("seq 1 200000 | cat | wc -l").unwrap();
    let (mut reader, writer) = pipe().unwrap();
    let running =
        spawn_pipeline(&pipeline, &Environment::new(), Box::new(NullStdin), Box::new(writer))
            .unwrap();
    let statuses = running.wait();
    assert!(statuses.iter().all(|s| *s == StageStatus::Exited(0)));

    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    assert_eq!(out.trim(), "200000");
}
