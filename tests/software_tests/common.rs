use std::{collections::VecDeque, fmt::Debug, io::Cursor, time::Duration};

use armock::{
    command::{self, Device},
    communication::{ComResult, CommunicationError, CommunicationHandle, LineHandle},
    harness,
    peripherals::{MemoryRegion, PeripheralState, DEFAULT_EEPROM_SIZE, PIN_COUNT},
};

pub enum ComEvent {
    /// The host sends the given line
    Host(&'static str),
    /// The device shall answer with the given line, terminator excluded
    Device(&'static str),
    /// The device shall report a failed check of the given function
    Diagnostic(&'static str),
    /// Makes the thread sleep before the next line is handed out
    Sleep(Duration),
    /// The device shall answer with a line, which is passed to the given function for further checks
    Action(Box<dyn Fn(&str)>),
}

impl Debug for ComEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host(arg0) => f.debug_tuple("Host").field(arg0).finish(),
            Self::Device(arg0) => f.debug_tuple("Device").field(arg0).finish(),
            Self::Diagnostic(arg0) => f.debug_tuple("Diagnostic").field(arg0).finish(),
            Self::Sleep(arg0) => f.debug_tuple("Sleep").field(arg0).finish(),
            Self::Action(_) => f.debug_tuple("Action").finish(),
        }
    }
}

/// Plays the host side of a session. Every line the device receives or emits is checked against
/// the supplied events. The input ends once the events are used up.
pub struct TestCom {
    expected_events: VecDeque<ComEvent>,
}

impl TestCom {
    pub fn new(events: Vec<ComEvent>) -> Self {
        TestCom { expected_events: events.into() }
    }

    pub fn is_complete(&self) -> bool {
        self.expected_events.is_empty()
    }

    fn next_event(&mut self, during: &str) -> ComEvent {
        match self.expected_events.pop_front() {
            Some(event) => event,
            None => panic!("No event left for {during}"),
        }
    }
}

impl CommunicationHandle for TestCom {
    fn receive_line(&mut self) -> ComResult<Vec<u8>> {
        loop {
            match self.expected_events.pop_front() {
                None => return Err(CommunicationError::Closed),
                Some(ComEvent::Host(line)) => {
                    println!("Host sent {line:?}");
                    return Ok(line.as_bytes().to_vec());
                }
                Some(ComEvent::Sleep(d)) => std::thread::sleep(d),
                Some(event) => panic!("Expected {event:?} instead of receive_line"),
            }
        }
    }

    fn write_response(&mut self, bytes: &[u8]) -> ComResult<()> {
        let text = std::str::from_utf8(bytes).unwrap();
        println!("Device sent {text:?}");
        let line = text.strip_suffix("\r\n").expect("response is not terminated");

        match self.next_event("write_response") {
            ComEvent::Device(expected) => assert_eq!(line, expected),
            ComEvent::Action(f) => f(line),
            event => panic!("Expected {event:?} instead of write_response({line:?})"),
        }
        Ok(())
    }

    fn write_diagnostic(&mut self, bytes: &[u8]) -> ComResult<()> {
        let text = std::str::from_utf8(bytes).unwrap();
        println!("Device reported {text:?}");

        match self.next_event("write_diagnostic") {
            ComEvent::Diagnostic(name) => assert!(harness::is_check_failure(text, name), "{text}"),
            event => panic!("Expected {event:?} instead of write_diagnostic({text:?})"),
        }
        Ok(())
    }
}

pub fn device() -> Device<MemoryRegion> {
    let state =
        PeripheralState::new(MemoryRegion::new(PIN_COUNT), MemoryRegion::new(DEFAULT_EEPROM_SIZE))
            .unwrap();
    Device::new(state)
}

/// Creates a scripted handle and a fresh in-memory device, logging into `tests/tmp/log-<thread>`
pub fn prepare_handles(events: Vec<ComEvent>) -> (TestCom, Device<MemoryRegion>) {
    let _ = std::fs::create_dir_all("tests/tmp");
    file_per_thread_logger::allow_uninitialized();
    file_per_thread_logger::initialize("tests/tmp/log-");

    (TestCom::new(events), device())
}

/// Serves `input` and returns everything written to the response and the diagnostic channel
pub fn run(device: &mut Device<MemoryRegion>, input: &str) -> (String, String) {
    let mut com = LineHandle::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new());
    command::serve(&mut com, device).unwrap();

    let (_, output, diagnostics) = com.into_inner();
    (String::from_utf8(output).unwrap(), String::from_utf8(diagnostics).unwrap())
}
