//! Number formatting of the microcontroller `Print` class

use super::MAX_BASE;

/// Formats `value` in `base` with upper-case digits. Returns [None] unless `base` is in 2..=36.
pub fn format_unsigned(mut value: u32, base: u32) -> Option<String> {
    if !(2..=MAX_BASE).contains(&base) {
        return None;
    }
    if value == 0 {
        return Some("0".into());
    }

    let mut digits = Vec::new();
    while value > 0 {
        let digit = char::from_digit(value % base, base)?;
        digits.push(digit.to_ascii_uppercase());
        value /= base;
    }
    Some(digits.iter().rev().collect())
}

/// Base 10 prints a sign. Every other base prints the two's-complement bit pattern unsigned.
pub fn format_signed(value: i32, base: u32) -> Option<String> {
    match base {
        10 if value < 0 => Some(format!("-{}", format_unsigned(value.unsigned_abs(), 10)?)),
        _ => format_unsigned(value as u32, base),
    }
}
