use crate::software_tests::common::{self, ComEvent::*};
use armock::command;
use armock::peripherals::{MemoryRegion, PeripheralState, Region, DEFAULT_EEPROM_SIZE};
use test_case::test_case;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test_case("ee   0x0\n", 0x000, "255\r\n")]
#[test_case("ee     1\n", 0x001, "254\r\n")]
#[test_case("ee    02\n", 0x002, "128\r\n")]
#[test_case("ee 0x07f\n", 0x07f, "127\r\n")]
#[test_case("ee   128\n", 0x080, "64\r\n")]
#[test_case("ee  0377\n", 0x0ff, "48\r\n")]
#[test_case("ee 0x100\n", 0x100, "32\r\n")]
#[test_case("ee   511\n", 0x1ff, "16\r\n")]
#[test_case("ee 01000\n", 0x200, "15\r\n")]
#[test_case("ee 0x2ff\n", 0x2ff, "2\r\n")]
#[test_case("ee   768\n", 0x300, "1\r\n")]
#[test_case("ee 01777\n", 0x3ff, "0\r\n")]
fn read_returns_stored_byte(cmd: &str, index: usize, expected: &str) {
    let mut device = common::device();
    let value: u8 = expected.trim_end().parse().unwrap();
    device.state_mut().eeprom_mut().set(index, value);

    let (out, err) = common::run(&mut device, cmd);
    assert_eq!(out, expected);
    assert_eq!(err, "");
}

#[test_case("ee   0x0  255\n", 0x000, 0xff)]
#[test_case("ee     1 0376\n", 0x001, 0xfe)]
#[test_case("ee    02 0x80\n", 0x002, 0x80)]
#[test_case("ee 0x07f  127\n", 0x07f, 0x7f)]
#[test_case("ee   128 0100\n", 0x080, 0x40)]
#[test_case("ee  0377 0x30\n", 0x0ff, 0x30)]
#[test_case("ee 0x100   32\n", 0x100, 0x20)]
#[test_case("ee   511  020\n", 0x1ff, 0x10)]
#[test_case("ee 01000 0x0f\n", 0x200, 0x0f)]
#[test_case("ee 0x2ff    2\n", 0x2ff, 0x02)]
#[test_case("ee   768   01\n", 0x300, 0x01)]
#[test_case("ee 01777  0x0\n", 0x3ff, 0x00)]
fn write_stores_exactly_one_byte(cmd: &str, index: usize, ee_value: u8) {
    let mut device = common::device();
    device.state_mut().eeprom_mut().fill(0xa5);

    let (out, err) = common::run(&mut device, cmd);
    assert_eq!((out.as_str(), err.as_str()), ("", ""));

    let mut expected = vec![0xa5; DEFAULT_EEPROM_SIZE];
    expected[index] = ee_value;
    assert_eq!(device.state().eeprom().to_vec(), expected);
}

#[test_case("ee 1024\n", "address < 1024")]
#[test_case("ee 0x400 1\n", "address < 1024")]
#[test_case("ee -1\n", "address < 1024")]
#[test_case("ee 0 256\n", "value < 256")]
fn out_of_range_access_is_silent_on_output(cmd: &str, check: &str) {
    let mut device = common::device();
    let (out, err) = common::run(&mut device, cmd);

    assert_eq!(out, "");
    assert_eq!(err, format!("armock: EEPROM: Check `{check}' failed.\n"));
    assert_eq!(device.state().eeprom().to_vec(), vec![0; DEFAULT_EEPROM_SIZE]);
}

#[test]
fn clear_zeroes_whole_memory() -> TestResult {
    let (mut com, mut device) = common::prepare_handles(vec![
        Host("ee 3 7"),
        Host("ee 1023 0xff"),
        Host("ee 1023"),
        Device("255"),
        Host("ec"),
        Host("ee 3"),
        Device("0"),
        Host("ec 1"),
    ]);

    command::serve(&mut com, &mut device)?;
    assert!(com.is_complete());
    assert_eq!(device.state().eeprom().to_vec(), vec![0; DEFAULT_EEPROM_SIZE]);
    Ok(())
}

#[test]
fn memory_survives_a_session() -> TestResult {
    let (mut com, mut device) = common::prepare_handles(vec![
        Host("ps ready"),
        Device("ready"),
        Device("7"),
        Host("ee 100 42"),
        Host("ps teardown"),
        Device("teardown"),
        Device("10"),
    ]);
    command::serve(&mut com, &mut device)?;
    assert!(com.is_complete());

    let (pins, eeprom) = {
        let state = device.into_state();
        (state.pins().to_vec(), state.eeprom().to_vec())
    };
    let mut next =
        command::Device::new(PeripheralState::new(MemoryRegion::from(pins), MemoryRegion::from(eeprom))?);
    let (out, _) = common::run(&mut next, "ee 100\n");
    assert_eq!(out, "42\r\n");
    Ok(())
}
