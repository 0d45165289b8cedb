use std::io::{Read, Write};
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Exit code reported for a stage whose program could not be located or executed.
pub const EXIT_NOT_FOUND: ExitCode = 127;

/// Exit code reported when the operating system refused to create a process.
pub const EXIT_SPAWN_FAILED: ExitCode = 126;

/// Exit code reported for a line that could not be parsed into a pipeline.
pub const EXIT_USAGE: ExitCode = 2;

/// Input stream handed to the first stage of a pipeline.
///
/// Ownership of the stream moves into the child: once [`Stdin::stdio`] has been
/// called the interpreter no longer holds the descriptor. A blanket
/// implementation exists for any type that implements `Read` and `Into<Stdio>`
/// (e.g. [`std::io::PipeReader`] or [`std::fs::File`]).
pub trait Stdin: Read {
    /// Convert this input into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Read + Into<Stdio>> Stdin for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Output stream handed to the last stage of a pipeline.
///
/// A blanket implementation exists for any type that implements `Write` and
/// `Into<Stdio>` (e.g. [`std::io::Stdout`], [`std::io::PipeWriter`]).
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}
