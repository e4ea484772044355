use std::str::FromStr;

use super::CommandError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
pub enum Opcode {
    #[strum(serialize = "ms")]
    Millis,
    #[strum(serialize = "ps")]
    PrintString,
    #[strum(serialize = "pu")]
    PrintUnsigned,
    #[strum(serialize = "pi")]
    PrintSigned,
    #[strum(serialize = "pm")]
    PinMode,
    #[strum(serialize = "dr")]
    DigitalRead,
    #[strum(serialize = "dw")]
    DigitalWrite,
    #[strum(serialize = "ar")]
    AnalogRead,
    #[strum(serialize = "aw")]
    AnalogWrite,
    #[strum(serialize = "ee")]
    Eeprom,
    #[strum(serialize = "ec")]
    EepromClear,
}

impl Opcode {
    /// The two letter code used on the wire
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Name of the microcontroller function the opcode stands for. Used in diagnostics.
    pub fn expanded_name(self) -> &'static str {
        match self {
            Opcode::Millis => "millis",
            Opcode::PrintString => "println<string>",
            Opcode::PrintUnsigned => "println<u32>",
            Opcode::PrintSigned => "println<i32>",
            Opcode::PinMode => "pinMode",
            Opcode::DigitalRead => "digitalRead",
            Opcode::DigitalWrite => "digitalWrite",
            Opcode::AnalogRead => "analogRead",
            Opcode::AnalogWrite => "analogWrite",
            Opcode::Eeprom => "EEPROM",
            Opcode::EepromClear => "EEPROM.clear",
        }
    }

    /// What is printed on the primary channel in place of a result when the operation fails
    pub fn sentinel(self) -> Option<&'static str> {
        match self {
            Opcode::DigitalRead | Opcode::AnalogRead => Some("-1"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.expanded_name())
    }
}

/// One parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Millis,
    PrintString(String),
    PrintUnsigned { value: u32, base: u32 },
    PrintSigned { value: i32, base: u32 },
    PinMode { pin: u32, mode: u32 },
    DigitalRead { pin: u32 },
    DigitalWrite { pin: u32, value: u32 },
    AnalogRead { pin: u32 },
    AnalogWrite { pin: u32, duty: u32 },
    EepromRead { address: u32 },
    EepromWrite { address: u32, value: u32 },
    EepromClear,
}

pub const DEFAULT_BASE: u32 = 10;
pub const MAX_BASE: u32 = 36;

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Millis => Opcode::Millis,
            Command::PrintString(_) => Opcode::PrintString,
            Command::PrintUnsigned { .. } => Opcode::PrintUnsigned,
            Command::PrintSigned { .. } => Opcode::PrintSigned,
            Command::PinMode { .. } => Opcode::PinMode,
            Command::DigitalRead { .. } => Opcode::DigitalRead,
            Command::DigitalWrite { .. } => Opcode::DigitalWrite,
            Command::AnalogRead { .. } => Opcode::AnalogRead,
            Command::AnalogWrite { .. } => Opcode::AnalogWrite,
            Command::EepromRead { .. } | Command::EepromWrite { .. } => Opcode::Eeprom,
            Command::EepromClear => Opcode::EepromClear,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_ascii_whitespace();
        let code = tokens.next().ok_or_else(|| malformed(line, "empty line"))?;
        let opcode =
            Opcode::from_str(code).map_err(|_| malformed(line, "unknown opcode"))?;
        let args: Vec<&str> = tokens.collect();

        let command = match (opcode, args.as_slice()) {
            (Opcode::Millis, []) => Command::Millis,
            (Opcode::PrintString, [text]) => Command::PrintString(text.to_string()),
            (Opcode::PrintUnsigned, [value, rest @ ..]) if rest.len() <= 1 => {
                Command::PrintUnsigned { value: literal(line, value)?, base: base(line, rest)? }
            }
            (Opcode::PrintSigned, [value, rest @ ..]) if rest.len() <= 1 => Command::PrintSigned {
                value: literal(line, value)? as i32,
                base: base(line, rest)?,
            },
            (Opcode::PinMode, [pin, mode]) => {
                Command::PinMode { pin: literal(line, pin)?, mode: literal(line, mode)? }
            }
            (Opcode::DigitalRead, [pin]) => Command::DigitalRead { pin: literal(line, pin)? },
            (Opcode::DigitalWrite, [pin, value]) => {
                Command::DigitalWrite { pin: literal(line, pin)?, value: literal(line, value)? }
            }
            (Opcode::AnalogRead, [pin]) => Command::AnalogRead { pin: literal(line, pin)? },
            (Opcode::AnalogWrite, [pin, duty]) => {
                Command::AnalogWrite { pin: literal(line, pin)?, duty: literal(line, duty)? }
            }
            (Opcode::Eeprom, [address]) => {
                Command::EepromRead { address: literal(line, address)? }
            }
            (Opcode::Eeprom, [address, value]) => Command::EepromWrite {
                address: literal(line, address)?,
                value: literal(line, value)?,
            },
            (Opcode::EepromClear, []) => Command::EepromClear,
            _ => return Err(malformed(line, "wrong number of arguments")),
        };

        Ok(command)
    }
}

fn malformed(line: &str, reason: &str) -> CommandError {
    CommandError::Malformed(format!("{reason}: {line:?}"))
}

fn literal(line: &str, token: &str) -> Result<u32, CommandError> {
    parse_literal(token).ok_or_else(|| malformed(line, "invalid integer literal"))
}

fn base(line: &str, rest: &[&str]) -> Result<u32, CommandError> {
    let Some(token) = rest.first() else {
        return Ok(DEFAULT_BASE);
    };
    match literal(line, token)? {
        b @ 2..=MAX_BASE => Ok(b),
        _ => Err(malformed(line, "unsupported base")),
    }
}

/// Parses an integer literal the way the C runtime's `strtoul(token, &end, 0)` does, but requires
/// the whole token to be consumed.
///
/// Accepts an optional sign, then hexadecimal (`0x`/`0X` prefix), octal (leading `0`) or decimal
/// digits. The magnitude is accumulated modulo 2^32 and a leading `-` negates it in two's
/// complement, so out-of-range literals wrap instead of failing.
pub fn parse_literal(token: &str) -> Option<u32> {
    let (negative, unsigned) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };

    let (radix, digits) = if let Some(hex) =
        unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() {
        return None;
    }

    let mut value: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        value = value.wrapping_mul(radix).wrapping_add(digit);
    }

    Some(if negative { value.wrapping_neg() } else { value })
}
