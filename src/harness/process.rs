use std::{
    ffi::OsStr,
    fs::File,
    io::{BufRead, BufReader, Write},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
};

use anyhow::Context;
use subprocess::{ExitStatus, Popen, PopenConfig, Redirection};

use super::{Dut, READ_TIMEOUT};

/// The simulator running as a child process, driven over its stdio. The child is killed when the
/// handle is dropped.
pub struct ProcessDut {
    process: Popen,
    stdin: Option<File>,
    stdout: Receiver<Vec<u8>>,
    stderr: Receiver<Vec<u8>>,
}

impl ProcessDut {
    pub fn spawn<S: AsRef<OsStr>>(argv: &[S]) -> anyhow::Result<Self> {
        let config = PopenConfig {
            stdin: Redirection::Pipe,
            stdout: Redirection::Pipe,
            stderr: Redirection::Pipe,
            detached: false,
            ..Default::default()
        };
        let mut process = Popen::create(argv, config).context("spawning device")?;

        let stdout = process.stdout.take().context("stdout is not piped")?;
        let stderr = process.stderr.take().context("stderr is not piped")?;
        let stdin = process.stdin.take();
        log::debug!("Spawned device with pid {:?}", process.pid());

        Ok(ProcessDut { process, stdin, stdout: read_lines(stdout), stderr: read_lines(stderr) })
    }

    /// Closes the command channel and waits for the device to exit, terminating it if it does not
    pub fn finish(&mut self) -> anyhow::Result<ExitStatus> {
        drop(self.stdin.take());

        if let Some(status) = self.process.wait_timeout(READ_TIMEOUT)? {
            return Ok(status);
        }
        log::warn!("Device did not exit on its own, terminating");
        self.process.terminate()?;
        Ok(self.process.wait()?)
    }
}

/// Forwards every line of `file` through a channel, so reads can be bounded by a timeout
fn read_lines(file: File) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut reader = BufReader::new(file);
        loop {
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

fn next_line(rx: &Receiver<Vec<u8>>) -> Option<Vec<u8>> {
    match rx.recv_timeout(READ_TIMEOUT) {
        Ok(line) => Some(line),
        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
    }
}

impl Dut for ProcessDut {
    fn write_command(&mut self, cmd: &str) -> anyhow::Result<()> {
        let stdin = self.stdin.as_mut().context("command channel already closed")?;
        stdin.write_all(cmd.as_bytes())?;
        stdin.flush()?;
        Ok(())
    }

    fn sreadline(&mut self, count: usize) -> anyhow::Result<String> {
        let mut result = Vec::new();
        for _ in 0..count {
            match next_line(&self.stdout) {
                Some(line) => result.extend(line),
                None => break,
            }
        }
        Ok(String::from_utf8(result)?)
    }

    fn ereadline(&mut self) -> anyhow::Result<String> {
        Ok(String::from_utf8(next_line(&self.stderr).unwrap_or_default())?)
    }
}

impl Drop for ProcessDut {
    fn drop(&mut self) {
        if self.process.poll().is_none() {
            let _ = self.process.kill();
        }
    }
}
