use std::io::{Read, Result as IoResult};
use std::process::Stdio;

/// The interpreter's own standard input, inherited by the first stage.
pub struct InheritedStdin;

impl Read for InheritedStdin {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        std::io::stdin().lock().read(buf)
    }
}

impl crate::command::Stdin for InheritedStdin {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::inherit()
    }
}

/// Input that is immediately at end-of-file.
///
/// Useful wherever the first stage must not read from the terminal.
pub struct NullStdin;

impl Read for NullStdin {
    fn read(&mut self, _buf: &mut [u8]) -> IoResult<usize> {
        Ok(0)
    }
}

impl crate::command::Stdin for NullStdin {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_stdin_is_at_eof() {
        let mut buf = String::new();
        let n = NullStdin.read_to_string(&mut buf).unwrap();
        assert_eq!(n, 0);
        assert!(buf.is_empty());
    }
}
