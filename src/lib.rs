//! Microcontroller peripheral simulator driven by a line-oriented text protocol.
//!
//! [command] parses and executes protocol lines against the simulated [peripherals], talking
//! through a [communication::CommunicationHandle]. [harness] is the other end of the link, used
//! by tests to drive either the simulator process or a real board.

pub mod command;
pub mod communication;
pub mod config;
pub mod harness;
pub mod peripherals;
