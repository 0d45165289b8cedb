//! Descriptor accounting for pipeline runs.
//!
//! Kept as the only test in this binary so no other test opens or closes
//! descriptors while the counts are taken.

#![cfg(target_os = "linux")]

use std::fs::{self, OpenOptions};

use myshell::executor::{run, spawn_pipeline};
use myshell::io_adapters::NullStdin;
use myshell::{Environment, Outcome, tokenize};

fn open_descriptors() -> usize {
    fs::read_dir("/proc/self/fd").unwrap().count()
}

fn dev_null() -> fs::File {
    OpenOptions::new().write(true).open("/dev/null").unwrap()
}

#[test]
fn pipelines_leave_no_descriptor_open() {
    let env = Environment::new();
    let before = open_descriptors();

    for line in [
        "echo hello",
        "echo hello | wc -w",
        "yes | head -n 1 | cat | cat",
        "echo a | nosuchprogram123 | cat",
        "nosuchprogram123 | cat",
    ] {
        let pipeline = tokenize(line).unwrap();
        let outcome = run(&pipeline, &env, Box::new(NullStdin), Box::new(dev_null()));
        assert!(
            matches!(outcome, Outcome::Success),
            "{line}: unexpected outcome {outcome:?}"
        );
        assert_eq!(open_descriptors(), before, "descriptor leaked by {line:?}");
    }

    let pipeline = tokenize("cat | cat | cat").unwrap();
    let running = spawn_pipeline(&pipeline, &env, Box::new(NullStdin), Box::new(dev_null())).unwrap();
    // Only the children hold pipe ends once every stage has been spawned.
    assert_eq!(open_descriptors(), before);
    assert_eq!(running.wait().len(), 3);
    assert_eq!(open_descriptors(), before);
}
