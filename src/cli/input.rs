//! Line input handling
//!
//! Features:
//! - One word per line from any `BufRead`
//! - Quit sentinel detection
//! - EOF surfaces as an I/O error

use std::io::{self, BufRead};

/// Literal line that ends the session
pub const QUIT_SENTINEL: &str = "q";

/// Reads submitted words
pub struct InputHandler<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> InputHandler<R> {
    pub fn new(reader: R) -> Self {
        InputHandler {
            reader,
            buf: String::new(),
        }
    }

    /// Read one line without its line terminator.
    /// Nothing else is trimmed: `" q"` is a word, not the quit sentinel.
    pub fn read_line(&mut self) -> io::Result<&str> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed before 'q' was entered",
            ));
        }
        if self.buf.ends_with('\n') {
            self.buf.pop();
            if self.buf.ends_with('\r') {
                self.buf.pop();
            }
        }
        Ok(&self.buf)
    }

    /// Check if a line is the quit sentinel
    pub fn is_quit(line: &str) -> bool {
        line == QUIT_SENTINEL
    }
}
