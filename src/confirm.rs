//! Source of answers to the overwrite prompt.

use std::io::{self, BufRead, StdinLock};

/// Answers a yes/no question that has already been printed
pub trait Confirm {
    /// Block until an answer is available. `Ok(false)` on end of input.
    fn confirm(&mut self) -> io::Result<bool>;
}

/// Reads one answer per line from any buffered reader
pub struct LineConfirm<R> {
    reader: R,
}

impl<R: BufRead> LineConfirm<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineConfirm<StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Confirm for LineConfirm<R> {
    fn confirm(&mut self) -> io::Result<bool> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        Ok(is_yes(&line))
    }
}

/// Only a literal `y` confirms
pub fn is_yes(answer: &str) -> bool {
    answer.trim() == "y"
}
