use super::Opcode;
use crate::{communication::CommunicationError, peripherals::PeripheralError};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The line is not a well-formed command. Ignored without any output.
    #[error("Malformed: {0}")]
    Malformed(String),
    /// A well-formed command was rejected by the peripherals
    #[error("Invalid {opcode}: {source}")]
    Invalid { opcode: Opcode, source: PeripheralError },
    #[error("Communication: {0}")]
    Communication(#[from] CommunicationError),
    #[error("Non-recoverable: {0:?}")]
    NonRecoverable(anyhow::Error),
}

impl CommandError {
    pub fn invalid(opcode: Opcode) -> impl FnOnce(PeripheralError) -> CommandError {
        move |source| CommandError::Invalid { opcode, source }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::NonRecoverable(e.into())
    }
}
