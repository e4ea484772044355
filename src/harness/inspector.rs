use anyhow::Context;
use shmregion::ShmRegion;

use crate::peripherals::PIN_COUNT;

/// Seeds and verifies the simulator's shared memory behind its back. Every byte written through
/// the inspector, or announced with one of the `expect_*` methods, is remembered and checked by
/// [Inspector::verify].
pub struct Inspector {
    pins: ShmRegion,
    eeprom: ShmRegion,
    expected_pins: Vec<u8>,
    expected_eeprom: Vec<u8>,
}

impl Inspector {
    pub fn open(pins: &str, eeprom: &str, eeprom_size: usize) -> anyhow::Result<Self> {
        let pins = ShmRegion::open(pins, PIN_COUNT).with_context(|| format!("opening {pins}"))?;
        let eeprom =
            ShmRegion::open(eeprom, eeprom_size).with_context(|| format!("opening {eeprom}"))?;

        Ok(Inspector {
            expected_pins: vec![0; pins.len()],
            expected_eeprom: vec![0; eeprom.len()],
            pins,
            eeprom,
        })
    }

    /// Expects both regions to be all zero again
    pub fn reset_expectations(&mut self) {
        self.expected_pins.fill(0);
        self.expected_eeprom.fill(0);
    }

    pub fn clear_eeprom(&mut self) {
        self.eeprom.fill(0);
        self.expected_eeprom.fill(0);
    }

    /// Writes raw bytes into the pin region without expecting them to persist
    pub fn scribble_pins(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        Ok(self.pins.write_at(0, bytes)?)
    }

    pub fn seed_pin(&mut self, pin: usize, value: u8) -> anyhow::Result<()> {
        anyhow::ensure!(self.pins.set(pin, value), "pin {pin} out of range");
        self.expect_pin(pin, value)
    }

    pub fn expect_pin(&mut self, pin: usize, value: u8) -> anyhow::Result<()> {
        *self.expected_pins.get_mut(pin).context("pin out of range")? = value;
        Ok(())
    }

    pub fn seed_eeprom(&mut self, address: usize, bytes: &[u8]) -> anyhow::Result<()> {
        self.eeprom.write_at(address, bytes)?;
        self.expected_eeprom[address..address + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn expect_eeprom(&mut self, address: usize, value: u8) -> anyhow::Result<()> {
        *self.expected_eeprom.get_mut(address).context("address out of range")? = value;
        Ok(())
    }

    pub fn pin(&self, pin: usize) -> Option<u8> {
        self.pins.get(pin)
    }

    pub fn eeprom(&self, address: usize) -> Option<u8> {
        self.eeprom.get(address)
    }

    /// Fails on the first region whose content differs from what is expected
    pub fn verify(&self) -> anyhow::Result<()> {
        for (region, expected) in
            [(&self.pins, &self.expected_pins), (&self.eeprom, &self.expected_eeprom)]
        {
            let actual = region.to_vec();
            if let Some(i) = actual.iter().zip(expected).position(|(a, e)| a != e) {
                anyhow::bail!(
                    "{}[{i}] is {:#04x}, expected {:#04x}",
                    region.name(),
                    actual[i],
                    expected[i]
                );
            }
        }
        Ok(())
    }
}
