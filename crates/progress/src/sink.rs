//! Destinations for rendered progress text

use console::Term;
use std::io::{self, Write};

use crate::ansi;

/// Where a renderer writes its output
pub trait OutputSink {
    /// Write `text` as-is
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination cannot be written.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Erase the current line
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination cannot be written.
    fn clear(&mut self) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}

/// In-memory accumulator
///
/// `clear` drops everything written so far, which models a single
/// overwritten terminal line.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: String,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written since the last clear
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.buffer.push_str(text);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.buffer.clear();
        Ok(())
    }
}

/// Live terminal
///
/// Every write starts with a carriage return so the next frame overwrites the
/// previous one in place. Any `io::Write` can stand in for the terminal.
#[derive(Debug, Clone)]
pub struct TerminalSink<W: Write = Term> {
    out: W,
}

impl TerminalSink<Term> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_writer(Term::stdout())
    }

    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Term::stderr())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Default for TerminalSink<Term> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(b"\r")?;
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.out.write_all(ansi::CLEAR_LINE.as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_accumulates_and_clears() {
        let mut sink = MemorySink::new();
        sink.write("[1/2] A").unwrap();
        sink.write("\n").unwrap();
        assert_eq!(sink.contents(), "[1/2] A\n");

        sink.clear().unwrap();
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn test_borrowed_sink_writes_through() {
        let mut sink = MemorySink::new();
        {
            let mut borrowed: &mut MemorySink = &mut sink;
            OutputSink::write(&mut borrowed, "hello").unwrap();
        }
        assert_eq!(sink.contents(), "hello");
    }

    #[test]
    fn test_terminal_sink_control_bytes() {
        let mut sink = TerminalSink::with_writer(Vec::new());
        sink.write("43% [==--]").unwrap();
        sink.clear().unwrap();
        assert_eq!(sink.get_ref().as_slice(), b"\r43% [==--]\x1b[2K\r");
    }

    #[test]
    fn test_boxed_sink_writes_through() {
        let mut inner = MemorySink::new();
        {
            let mut boxed: Box<dyn OutputSink + '_> = Box::new(&mut inner);
            boxed.write("x").unwrap();
            boxed.clear().unwrap();
            boxed.write("y").unwrap();
        }
        assert_eq!(inner.contents(), "y");
    }
}
