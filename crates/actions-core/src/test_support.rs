// Shared test doubles. The recording console captures output lines so
// tests never touch process stdout, and never need process-global state.

use std::io;

use parking_lot::Mutex;

use crate::command_issuer::Console;

/// A [`Console`] that records every line written to it.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far, in write order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Console for RecordingConsole {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }
}

/// A [`Console`] whose writes always fail, for error-path tests.
#[derive(Debug, Default)]
pub struct FailingConsole;

impl Console for FailingConsole {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}
