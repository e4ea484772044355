//! Drives a device under test through the line protocol and checks its answers. The device is
//! either the simulator running as a subprocess or a board attached to a serial port.

use std::{str::FromStr, time::Duration};

use crate::command::{Opcode, READY, TEARDOWN};

mod inspector;
mod process;
mod serial;

pub use inspector::Inspector;
pub use process::ProcessDut;
pub use serial::SerialDut;

/// How long a read waits for the device before giving up
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

pub trait Dut {
    /// Sends raw command text. `cmd` carries its own line terminators.
    fn write_command(&mut self, cmd: &str) -> anyhow::Result<()>;

    /// Reads up to `count` response lines, including their terminators. Stops early once no line
    /// arrives within [READ_TIMEOUT].
    fn sreadline(&mut self, count: usize) -> anyhow::Result<String>;

    /// Reads one diagnostic line, or an empty string if none arrives within [READ_TIMEOUT]
    fn ereadline(&mut self) -> anyhow::Result<String>;

    fn srun(&mut self, cmd: &str, readlines: usize) -> anyhow::Result<String> {
        self.write_command(cmd)?;
        if readlines == 0 {
            return Ok(String::new());
        }
        self.sreadline(readlines)
    }

    /// Runs `cmd` and fails unless exactly `expected` comes back
    fn assert_srun(&mut self, cmd: &str, expected: &str) -> anyhow::Result<()> {
        let response = self.srun(cmd, expected.matches('\n').count())?;
        anyhow::ensure!(
            response == expected,
            "{cmd:?} answered {response:?}, expected {expected:?}"
        );
        Ok(())
    }
}

/// Maps a command line to the name its diagnostics carry
pub fn expand_cmd(cmd: &str) -> Option<&'static str> {
    let code = cmd.get(..2)?;
    Opcode::from_str(code).ok().map(Opcode::expanded_name)
}

/// Whether `line` is a failed-check diagnostic of the function called `name`
pub fn is_check_failure(line: &str, name: &str) -> bool {
    line.contains(name) && line.contains("Check") && line.contains("failed")
}

/// Waits until the device has started up
pub fn handshake(dut: &mut (impl Dut + ?Sized)) -> anyhow::Result<()> {
    dut.assert_srun(&format!("ps {READY}\n"), "ready\r\n7\r\n")
}

/// Ends the session. The device must not have reported anything left over.
pub fn teardown(dut: &mut (impl Dut + ?Sized)) -> anyhow::Result<()> {
    let response = dut.srun(&format!("ps {TEARDOWN}\n"), 2)?;
    anyhow::ensure!(response == "teardown\r\n10\r\n", "unexpected teardown answer {response:?}");

    let leftover = dut.ereadline()?;
    anyhow::ensure!(leftover.is_empty(), "unexpected diagnostic {leftover:?}");
    Ok(())
}
