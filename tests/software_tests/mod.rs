pub mod common;

mod eeprom;
mod serial_print;
