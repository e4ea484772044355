mod serial;
pub use serial::open_serial;

use std::io::{BufRead, Read, Write};

pub type ComResult<T> = Result<T, CommunicationError>;

/// Longest command line accepted, terminator included
pub const MAX_LINE: usize = 4096;

/// Line-oriented link to whoever drives the simulator. Commands arrive one per `\n`-terminated
/// line, responses leave `\r\n`-terminated on the primary channel and diagnostics leave on a
/// separate channel.
pub trait CommunicationHandle {
    const LINE_TERMINATOR: &'static str = "\r\n";

    /// Blocks until a full line is available and returns it without its terminator.
    /// Returns [CommunicationError::Closed] once the input has ended and
    /// [CommunicationError::LineTooLong] after skipping a line longer than [MAX_LINE].
    fn receive_line(&mut self) -> ComResult<Vec<u8>>;

    /// Writes `bytes` to the primary channel and flushes it
    fn write_response(&mut self, bytes: &[u8]) -> ComResult<()>;

    /// Writes `bytes` to the diagnostic channel and flushes it
    fn write_diagnostic(&mut self, bytes: &[u8]) -> ComResult<()>;

    /// Prints `text` followed by the line terminator. Returns the number of bytes written, which
    /// is what the print family reports as its length line.
    fn println(&mut self, text: &str) -> ComResult<usize> {
        let line = format!("{text}{}", Self::LINE_TERMINATOR);
        self.write_response(line.as_bytes())?;
        Ok(line.len())
    }

    fn send_diagnostic(&mut self, text: &str) -> ComResult<()> {
        self.write_diagnostic(format!("{text}\n").as_bytes())
    }
}

/// Generic handle over any buffered reader and two writers
pub struct LineHandle<R: BufRead, W: Write, E: Write> {
    input: R,
    output: W,
    diagnostics: E,
}

impl<R: BufRead, W: Write, E: Write> LineHandle<R, W, E> {
    pub fn new(input: R, output: W, diagnostics: E) -> Self {
        LineHandle { input, output, diagnostics }
    }

    pub fn into_inner(self) -> (R, W, E) {
        (self.input, self.output, self.diagnostics)
    }

    /// Appends input to `line` until a newline, end of input or [MAX_LINE] bytes in total
    fn read_capped(&mut self, line: &mut Vec<u8>) -> std::io::Result<()> {
        loop {
            let limit = MAX_LINE.saturating_sub(line.len()) as u64;
            match (&mut self.input).take(limit).read_until(b'\n', line) {
                Ok(_) => return Ok(()),
                // serial ports time out while idle, keep what was read so far
                Err(e) if matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                ) => {}
                Err(e) => return Err(e),
            }
        }
    }
}

/// Serves on the process' stdin, stdout and stderr
pub fn stdio() -> LineHandle<std::io::StdinLock<'static>, std::io::Stdout, std::io::Stderr> {
    LineHandle::new(std::io::stdin().lock(), std::io::stdout(), std::io::stderr())
}

impl<R: BufRead, W: Write, E: Write> CommunicationHandle for LineHandle<R, W, E> {
    fn receive_line(&mut self) -> ComResult<Vec<u8>> {
        let mut line = Vec::new();
        self.read_capped(&mut line)?;

        if line.is_empty() {
            return Err(CommunicationError::Closed);
        }
        if line.len() >= MAX_LINE && !line.ends_with(b"\n") {
            let mut total = line.len();
            loop {
                line.clear();
                self.read_capped(&mut line)?;
                total += line.len();
                if line.is_empty() || line.ends_with(b"\n") {
                    break;
                }
            }
            return Err(CommunicationError::LineTooLong(total));
        }
        if line.ends_with(b"\n") {
            line.pop();
        }
        if line.ends_with(b"\r") {
            line.pop();
        }
        Ok(line)
    }

    fn write_response(&mut self, bytes: &[u8]) -> ComResult<()> {
        self.output.write_all(bytes)?;
        self.output.flush()?;
        Ok(())
    }

    fn write_diagnostic(&mut self, bytes: &[u8]) -> ComResult<()> {
        self.diagnostics.write_all(bytes)?;
        self.diagnostics.flush()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    /// The command channel reached end of input
    #[error("command channel closed")]
    Closed,
    /// A line exceeded [MAX_LINE] bytes and was skipped
    #[error("line of {0} bytes exceeds {MAX_LINE}")]
    LineTooLong(usize),
    /// Signals that a receive timed out
    #[error("timed out")]
    TimedOut,
    /// Signals that the underlying sending or receiving failed. Not recoverable on its own.
    #[error("I/O: {0}")]
    Io(std::io::Error),
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
}

impl From<std::io::Error> for CommunicationError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::TimedOut => CommunicationError::TimedOut,
            _ => CommunicationError::Io(value),
        }
    }
}
