use super::PinMode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeripheralError {
    /// An index, address or value lies outside its valid domain `[0, limit)`
    #[error("{what} {value} is outside [0, {limit})")]
    Range { what: &'static str, value: u32, limit: u32 },
    /// The pin is not configured for the requested operation
    #[error("pin {pin} is in {actual} mode, expected {expected}")]
    Mode { pin: u8, expected: PinMode, actual: PinMode },
    /// A backing region cannot hold the state it is supposed to mirror
    #[error("{what} region has {len} bytes, needs {required}")]
    RegionTooSmall { what: &'static str, len: usize, required: usize },
}

impl PeripheralError {
    pub fn range(what: &'static str, value: u32, limit: usize) -> Self {
        PeripheralError::Range { what, value, limit: limit as u32 }
    }

    /// The condition that failed, written the way the check reads in the simulator
    pub fn check(&self) -> String {
        match self {
            PeripheralError::Range { what, limit, .. } => format!("{what} < {limit}"),
            PeripheralError::Mode { pin, expected, .. } => {
                format!("pin_modes[{pin}] == {}", expected.to_string().to_uppercase())
            }
            PeripheralError::RegionTooSmall { what, required, .. } => {
                format!("{what}.len() >= {required}")
            }
        }
    }
}
