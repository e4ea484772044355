use super::print::{format_signed, format_unsigned};
use super::{CommandError, CommandResult, Device, Opcode, Phase, READY, TEARDOWN};
use crate::communication::CommunicationHandle;
use crate::peripherals::Region;

/// Prints elapsed milliseconds since startup
pub fn millis<R: Region>(com: &mut impl CommunicationHandle, device: &mut Device<R>) -> CommandResult {
    com.println(&device.state.millis().to_string())?;
    Ok(())
}

/// Echoes `text` and the number of bytes written for it. Also drives the ready/teardown handshake.
pub fn print_string<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
    text: &str,
) -> CommandResult {
    match text {
        READY if device.phase == Phase::Startup => {
            log::info!("Handshake complete");
            device.phase = Phase::Running;
        }
        TEARDOWN => {
            device.phase = Phase::Stopped;
            log::info!("Teardown requested, flushing peripheral state");
            // regions are synced before the final echo
            device.state.flush()?;
        }
        _ => {}
    }

    println_with_length(com, text)
}

pub fn print_unsigned(com: &mut impl CommunicationHandle, value: u32, base: u32) -> CommandResult {
    let text = format_unsigned(value, base).ok_or_else(|| unsupported_base(base))?;
    println_with_length(com, &text)
}

pub fn print_signed(com: &mut impl CommunicationHandle, value: i32, base: u32) -> CommandResult {
    let text = format_signed(value, base).ok_or_else(|| unsupported_base(base))?;
    println_with_length(com, &text)
}

fn unsupported_base(base: u32) -> CommandError {
    CommandError::Malformed(format!("unsupported base {base}"))
}

fn println_with_length(com: &mut impl CommunicationHandle, text: &str) -> CommandResult {
    let written = com.println(text)?;
    com.println(&written.to_string())?;
    Ok(())
}

pub fn pin_mode<R: Region>(device: &mut Device<R>, pin: u32, mode: u32) -> CommandResult {
    let previous = device.state.set_mode(pin, mode).map_err(CommandError::invalid(Opcode::PinMode))?;
    log::debug!("Pin {pin} mode {previous} -> {}", device.state.mode(pin).unwrap_or_default());
    Ok(())
}

pub fn digital_read<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
    pin: u32,
) -> CommandResult {
    let value =
        device.state.digital_read(pin).map_err(CommandError::invalid(Opcode::DigitalRead))?;
    com.println(&value.to_string())?;
    Ok(())
}

pub fn digital_write<R: Region>(device: &mut Device<R>, pin: u32, value: u32) -> CommandResult {
    device
        .state
        .digital_write(pin, value)
        .map_err(CommandError::invalid(Opcode::DigitalWrite))?;
    Ok(())
}

pub fn analog_read<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
    pin: u32,
) -> CommandResult {
    let value =
        device.state.analog_read(pin).map_err(CommandError::invalid(Opcode::AnalogRead))?;
    com.println(&value.to_string())?;
    Ok(())
}

pub fn analog_write<R: Region>(device: &mut Device<R>, pin: u32, duty: u32) -> CommandResult {
    device
        .state
        .analog_write(pin, duty)
        .map_err(CommandError::invalid(Opcode::AnalogWrite))?;
    Ok(())
}

pub fn eeprom_read<R: Region>(
    com: &mut impl CommunicationHandle,
    device: &mut Device<R>,
    address: u32,
) -> CommandResult {
    let value =
        device.state.eeprom_read(address).map_err(CommandError::invalid(Opcode::Eeprom))?;
    com.println(&value.to_string())?;
    Ok(())
}

pub fn eeprom_write<R: Region>(device: &mut Device<R>, address: u32, value: u32) -> CommandResult {
    let previous = device
        .state
        .eeprom_write(address, value)
        .map_err(CommandError::invalid(Opcode::Eeprom))?;
    log::debug!("EEPROM[{address}] {previous} -> {value}");
    Ok(())
}

pub fn eeprom_clear<R: Region>(device: &mut Device<R>) -> CommandResult {
    log::info!("Clearing {} bytes of EEPROM", device.state.eeprom_size());
    device.state.eeprom_clear();
    Ok(())
}
