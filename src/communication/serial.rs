use std::{io::BufReader, time::Duration};

use serialport::SerialPort;

use super::{ComResult, LineHandle};

/// Poll interval of the port while waiting for the next command
const READ_TIMEOUT: Duration = Duration::from_millis(500);

pub type SerialHandle = LineHandle<BufReader<Box<dyn SerialPort>>, Box<dyn SerialPort>, Box<dyn SerialPort>>;

/// Opens `path` for serving. Responses and diagnostics share the line, as on a real board.
pub fn open_serial(path: &str, baudrate: u32) -> ComResult<SerialHandle> {
    let port = serialport::new(path, baudrate).timeout(READ_TIMEOUT).open()?;
    let output = port.try_clone()?;
    let diagnostics = port.try_clone()?;
    log::info!("Serving on {path} at {baudrate} baud");

    Ok(LineHandle::new(BufReader::new(port), output, diagnostics))
}
