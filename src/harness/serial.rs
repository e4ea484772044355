use std::io::{BufRead, BufReader, ErrorKind, Write};

use anyhow::Context;
use serialport::SerialPort;

use super::{Dut, READ_TIMEOUT};

/// A board attached to a serial port. Diagnostics share the line with responses.
pub struct SerialDut {
    reader: BufReader<Box<dyn SerialPort>>,
    writer: Box<dyn SerialPort>,
}

impl SerialDut {
    /// Opens `path` and waits for the board to come out of the reset the connection triggers
    pub fn open(path: &str, baudrate: u32) -> anyhow::Result<Self> {
        let port = serialport::new(path, baudrate)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("opening {path}"))?;
        let writer = port.try_clone()?;
        let mut dut = SerialDut { reader: BufReader::new(port), writer };

        std::thread::sleep(READ_TIMEOUT);
        let greeting = dut.read_line()?;
        log::debug!("Discarded {greeting:?} after reset");

        Ok(dut)
    }

    /// Reads one line, or whatever arrived before the timeout
    fn read_line(&mut self) -> anyhow::Result<Vec<u8>> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(_) => Ok(line),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(line),
            Err(e) => Err(e.into()),
        }
    }
}

impl Dut for SerialDut {
    fn write_command(&mut self, cmd: &str) -> anyhow::Result<()> {
        self.writer.write_all(cmd.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn sreadline(&mut self, count: usize) -> anyhow::Result<String> {
        let mut result = Vec::new();
        for _ in 0..count {
            let line = self.read_line()?;
            if line.is_empty() {
                break;
            }
            result.extend(line);
        }
        Ok(String::from_utf8(result)?)
    }

    fn ereadline(&mut self) -> anyhow::Result<String> {
        Ok(String::from_utf8(self.read_line()?)?)
    }
}
