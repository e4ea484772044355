//! Simulated microcontroller peripherals: a fixed set of pins, a byte-addressable persistent
//! memory and a free-running millisecond clock.
//!
//! Pin values and persistent memory are kept in [Region]s, so they can be backed by shared memory
//! and observed from outside the process. Pin modes are private to the simulator.
//!
//! Every operation validates all of its arguments before touching any state. A failed operation
//! leaves the state exactly as it was.

mod clock;
mod error;
mod region;

pub use clock::Clock;
pub use error::PeripheralError;
pub use region::{MemoryRegion, Region};

pub const PIN_COUNT: usize = 16;
pub const DEFAULT_EEPROM_SIZE: usize = 1024;

/// Byte stored for a digital "on"
pub const DIGITAL_HIGH: u8 = 0xff;
pub const DIGITAL_LOW: u8 = 0x00;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PinMode {
    /// No `pinMode` was issued since startup
    #[default]
    Unset,
    Input,
    Output,
}

impl TryFrom<u32> for PinMode {
    type Error = PeripheralError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PinMode::Input),
            1 => Ok(PinMode::Output),
            v => Err(PeripheralError::range("mode", v, 2)),
        }
    }
}

/// Owned copy of the whole peripheral state at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub pins: Vec<u8>,
    pub modes: [PinMode; PIN_COUNT],
    pub eeprom: Vec<u8>,
    pub millis: u32,
}

pub struct PeripheralState<R: Region> {
    pins: R,
    modes: [PinMode; PIN_COUNT],
    eeprom: R,
    clock: Clock,
}

impl<R: Region> PeripheralState<R> {
    /// Takes ownership of the backing regions and starts the clock. Pin values are cleared and all
    /// modes reset, persistent memory is left as it is.
    pub fn new(mut pins: R, eeprom: R) -> Result<Self, PeripheralError> {
        if pins.len() < PIN_COUNT {
            return Err(PeripheralError::RegionTooSmall {
                what: "pins",
                len: pins.len(),
                required: PIN_COUNT,
            });
        }
        if eeprom.is_empty() {
            return Err(PeripheralError::RegionTooSmall { what: "eeprom", len: 0, required: 1 });
        }

        pins.fill(DIGITAL_LOW);
        Ok(PeripheralState { pins, modes: [PinMode::Unset; PIN_COUNT], eeprom, clock: Clock::start() })
    }

    pub fn eeprom_size(&self) -> usize {
        self.eeprom.len()
    }

    pub fn millis(&self) -> u32 {
        self.clock.millis()
    }

    pub fn mode(&self, pin: u32) -> Result<PinMode, PeripheralError> {
        let pin = Self::check_pin(pin)?;
        Ok(self.modes[pin])
    }

    /// Configures `pin` as input (`0`) or output (`1`)
    pub fn set_mode(&mut self, pin: u32, mode: u32) -> Result<PinMode, PeripheralError> {
        let pin = Self::check_pin(pin)?;
        let mode = PinMode::try_from(mode)?;

        let previous = std::mem::replace(&mut self.modes[pin], mode);
        Ok(previous)
    }

    /// Returns 1 if the stored byte is nonzero, 0 otherwise
    pub fn digital_read(&self, pin: u32) -> Result<u8, PeripheralError> {
        let pin = self.check_mode(pin, PinMode::Input)?;
        Ok((self.pin_value(pin) != DIGITAL_LOW) as u8)
    }

    /// Writes 0 (off) or 1 (on). Returns the previously stored byte.
    pub fn digital_write(&mut self, pin: u32, value: u32) -> Result<u8, PeripheralError> {
        let pin = self.check_mode(pin, PinMode::Output)?;
        let stored = match value {
            0 => DIGITAL_LOW,
            1 => DIGITAL_HIGH,
            v => return Err(PeripheralError::range("value", v, 2)),
        };

        Ok(self.replace_pin_value(pin, stored))
    }

    /// Returns the raw sample stored for `pin`
    pub fn analog_read(&self, pin: u32) -> Result<u8, PeripheralError> {
        let pin = self.check_mode(pin, PinMode::Input)?;
        Ok(self.pin_value(pin))
    }

    /// Sets the PWM duty cycle of `pin`. Returns the previously stored byte.
    pub fn analog_write(&mut self, pin: u32, duty: u32) -> Result<u8, PeripheralError> {
        let pin = self.check_mode(pin, PinMode::Output)?;
        let duty = u8::try_from(duty).map_err(|_| PeripheralError::range("duty", duty, 256))?;

        Ok(self.replace_pin_value(pin, duty))
    }

    pub fn eeprom_read(&self, address: u32) -> Result<u8, PeripheralError> {
        let address = self.check_address(address)?;
        self.eeprom.get(address).ok_or(PeripheralError::range(
            "address",
            address as u32,
            self.eeprom.len(),
        ))
    }

    /// Writes one byte of persistent memory. Returns the previously stored byte.
    pub fn eeprom_write(&mut self, address: u32, value: u32) -> Result<u8, PeripheralError> {
        let index = self.check_address(address)?;
        let value = u8::try_from(value).map_err(|_| PeripheralError::range("value", value, 256))?;

        let previous = self.eeprom_read(address)?;
        self.eeprom.set(index, value);
        Ok(previous)
    }

    /// Resets the whole persistent memory to zero
    pub fn eeprom_clear(&mut self) {
        self.eeprom.fill(0);
    }

    /// Raw pin bytes, as an external inspector sees them
    pub fn pins(&self) -> &R {
        &self.pins
    }

    /// Raw pin bytes, for seeding input values from outside the protocol
    pub fn pins_mut(&mut self) -> &mut R {
        &mut self.pins
    }

    pub fn eeprom(&self) -> &R {
        &self.eeprom
    }

    pub fn eeprom_mut(&mut self) -> &mut R {
        &mut self.eeprom
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pins: self.pins.to_vec(),
            modes: self.modes,
            eeprom: self.eeprom.to_vec(),
            millis: self.millis(),
        }
    }

    /// Flushes both backing regions
    pub fn flush(&self) -> std::io::Result<()> {
        self.pins.flush()?;
        self.eeprom.flush()
    }

    fn check_pin(pin: u32) -> Result<usize, PeripheralError> {
        if (pin as usize) < PIN_COUNT {
            Ok(pin as usize)
        } else {
            Err(PeripheralError::range("pin", pin, PIN_COUNT))
        }
    }

    fn check_mode(&self, pin: u32, expected: PinMode) -> Result<usize, PeripheralError> {
        let index = Self::check_pin(pin)?;
        let actual = self.modes[index];
        if actual != expected {
            return Err(PeripheralError::Mode { pin: index as u8, expected, actual });
        }
        Ok(index)
    }

    fn check_address(&self, address: u32) -> Result<usize, PeripheralError> {
        if (address as usize) < self.eeprom.len() {
            Ok(address as usize)
        } else {
            Err(PeripheralError::range("address", address, self.eeprom.len()))
        }
    }

    fn pin_value(&self, pin: usize) -> u8 {
        // pin is bounds checked and the region holds at least PIN_COUNT bytes
        self.pins.get(pin).unwrap_or(DIGITAL_LOW)
    }

    fn replace_pin_value(&mut self, pin: usize, value: u8) -> u8 {
        let previous = self.pin_value(pin);
        self.pins.set(pin, value);
        previous
    }
}
