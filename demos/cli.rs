//! Interactive console for poking at a device by hand.
//!
//! `cargo run --example cli -- target/debug/armock` drives the simulator,
//! `cargo run --example cli -- /dev/ttyUSB0` drives a board.

use std::error::Error;

use armock::{
    command::Opcode,
    harness::{self, Dut, ProcessDut, SerialDut},
};
use strum::IntoEnumIterator;

fn main() -> Result<(), Box<dyn Error>> {
    let target = std::env::args()
        .nth(1)
        .ok_or("Pass in the simulator binary or a serial device")?;

    let mut dut: Box<dyn Dut> = if target.starts_with("/dev/") {
        Box::new(SerialDut::open(&target, 115200)?)
    } else {
        Box::new(ProcessDut::spawn(&[target.as_str(), "armock_pins", "armock_eeprom"])?)
    };
    harness::handshake(dut.as_mut())?;

    loop {
        match inquire_and_send_command(dut.as_mut()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {e}"),
        }
        println!("------------------------");
    }

    harness::teardown(dut.as_mut())?;
    Ok(())
}

/// Arguments the command line of `opcode` takes. Optional ones may be left empty.
fn arguments(opcode: Opcode) -> &'static [(&'static str, bool)] {
    match opcode {
        Opcode::Millis | Opcode::EepromClear => &[],
        Opcode::PrintString => &[("Text (one word):", false)],
        Opcode::PrintUnsigned | Opcode::PrintSigned => &[("Value:", false), ("Base:", true)],
        Opcode::PinMode => &[("Pin:", false), ("Mode (0 input, 1 output):", false)],
        Opcode::DigitalRead | Opcode::AnalogRead => &[("Pin:", false)],
        Opcode::DigitalWrite | Opcode::AnalogWrite => &[("Pin:", false), ("Value:", false)],
        Opcode::Eeprom => &[("Address:", false), ("Value (empty to read):", true)],
    }
}

/// Number of response lines the command line answers with when it succeeds
fn expected_lines(opcode: Opcode, args: &[String]) -> usize {
    match opcode {
        Opcode::PrintString | Opcode::PrintUnsigned | Opcode::PrintSigned => 2,
        Opcode::Millis | Opcode::DigitalRead | Opcode::AnalogRead => 1,
        Opcode::Eeprom if args.len() == 1 => 1,
        _ => 0,
    }
}

/// Returns false once the user asks to quit
fn inquire_and_send_command(dut: &mut dyn Dut) -> Result<bool, Box<dyn Error>> {
    let mut options: Vec<String> =
        Opcode::iter().map(|op| format!("{} {}", op.code(), op.expanded_name())).collect();
    options.push("quit".into());
    let selected = inquire::Select::new("Select command", options).prompt()?;

    let Some(opcode) = Opcode::iter().find(|op| selected.starts_with(op.code())) else {
        return Ok(false);
    };

    let mut args = Vec::new();
    for (prompt, optional) in arguments(opcode) {
        let mut text = inquire::Text::new(prompt);
        if *optional {
            text = text.with_help_message("optional");
        }
        let answer = text.prompt()?;
        if answer.trim().is_empty() && *optional {
            continue;
        }
        args.push(answer.trim().to_string());
    }

    let mut line = opcode.code().to_string();
    for arg in &args {
        line.push(' ');
        line.push_str(arg);
    }
    line.push('\n');

    let response = dut.srun(&line, expected_lines(opcode, &args))?;
    for l in response.lines() {
        println!("Received {l:?}");
    }

    let diagnostic = dut.ereadline()?;
    if !diagnostic.is_empty() {
        println!("Diagnostic {:?}", diagnostic.trim_end());
    }

    Ok(true)
}
