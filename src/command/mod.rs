use crate::communication::{CommunicationError, CommunicationHandle};
use crate::peripherals::{PeripheralState, Region};

mod error;
mod handlers;
mod parser;
mod print;

pub use error::CommandError;
pub use handlers::*;
pub use parser::{parse_literal, Command, Opcode, DEFAULT_BASE, MAX_BASE};
pub use print::{format_signed, format_unsigned};

pub type CommandResult = Result<(), CommandError>;

/// Argument of `ps` that completes the startup handshake
pub const READY: &str = "ready";
/// Argument of `ps` that ends the session
pub const TEARDOWN: &str = "teardown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Phase {
    /// Waiting for the `ready` handshake. Commands are already served.
    Startup,
    Running,
    /// Teardown was requested. Every further line is ignored.
    Stopped,
}

/// The simulated microcontroller as seen by the protocol: peripheral state plus the session phase
pub struct Device<R: Region> {
    state: PeripheralState<R>,
    phase: Phase,
    program_name: String,
}

impl<R: Region> Device<R> {
    pub fn new(state: PeripheralState<R>) -> Self {
        Device { state, phase: Phase::Startup, program_name: "armock".into() }
    }

    /// Sets the name diagnostics are prefixed with
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &PeripheralState<R> {
        &self.state
    }

    /// Direct access to the peripherals, for seeding and inspection outside the protocol
    pub fn state_mut(&mut self) -> &mut PeripheralState<R> {
        &mut self.state
    }

    pub fn into_state(self) -> PeripheralState<R> {
        self.state
    }

    fn diagnostic(&self, opcode: Opcode, check: &str) -> String {
        format!("{}: {}: Check `{check}' failed.", self.program_name, opcode.expanded_name())
    }
}

/// Reads one command line, executes it and reports rejected operations. Malformed lines produce no
/// output at all, rejected operations print the opcode's sentinel and one diagnostic line.
pub fn handle_command<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
) -> CommandResult {
    let ret = process_command(com, device);

    match &ret {
        Err(CommandError::Invalid { opcode, source }) => {
            log::warn!("Rejected {opcode}: {source}");
            if let Some(sentinel) = opcode.sentinel() {
                com.println(sentinel)?;
            }
            com.send_diagnostic(&device.diagnostic(*opcode, &source.check()))?;
        }
        Err(CommandError::Malformed(reason)) => {
            log::debug!("Ignoring {reason}");
        }
        _ => {}
    }

    ret
}

pub fn process_command<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
) -> CommandResult {
    let line = match com.receive_line() {
        Err(e @ CommunicationError::LineTooLong(_)) => {
            return Err(CommandError::Malformed(e.to_string()))
        }
        line => line?,
    };

    if device.phase == Phase::Stopped {
        log::debug!("Stopped, ignoring {} bytes", line.len());
        return Ok(());
    }

    let line = std::str::from_utf8(&line)
        .map_err(|e| CommandError::Malformed(format!("line is not UTF-8: {e}")))?;
    let command: Command = line.parse()?;

    if device.phase == Phase::Startup && command != Command::PrintString(READY.into()) {
        log::warn!("Received {line:?} before the ready handshake");
    }

    execute(com, device, command)
}

/// Dispatches an already parsed command
pub fn execute<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
    command: Command,
) -> CommandResult {
    match command {
        Command::Millis => millis(com, device),
        Command::PrintString(text) => print_string(com, device, &text),
        Command::PrintUnsigned { value, base } => print_unsigned(com, value, base),
        Command::PrintSigned { value, base } => print_signed(com, value, base),
        Command::PinMode { pin, mode } => pin_mode(device, pin, mode),
        Command::DigitalRead { pin } => digital_read(com, device, pin),
        Command::DigitalWrite { pin, value } => digital_write(device, pin, value),
        Command::AnalogRead { pin } => analog_read(com, device, pin),
        Command::AnalogWrite { pin, duty } => analog_write(device, pin, duty),
        Command::EepromRead { address } => eeprom_read(com, device, address),
        Command::EepromWrite { address, value } => eeprom_write(device, address, value),
        Command::EepromClear => eeprom_clear(device),
    }
}

/// Serves commands until teardown or until the command channel closes. Only failures of the
/// channel itself end the loop with an error.
pub fn serve<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
) -> Result<(), CommunicationError> {
    while device.phase != Phase::Stopped {
        match handle_command(com, device) {
            Ok(()) | Err(CommandError::Malformed(_)) | Err(CommandError::Invalid { .. }) => {}
            Err(CommandError::Communication(CommunicationError::Closed)) => {
                log::info!("Command channel closed");
                return Ok(());
            }
            Err(CommandError::Communication(e)) => {
                log::error!("Communication failed: {e}");
                return Err(e);
            }
            Err(e @ CommandError::NonRecoverable(_)) => {
                log::error!("Command failed with {e}");
            }
        }
    }

    log::info!("Stopped");
    Ok(())
}
