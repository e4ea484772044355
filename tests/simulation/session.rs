use crate::simulation::*;
use armock::harness::{Dut, ProcessDut};
use subprocess::ExitStatus;

#[test]
fn second_teardown_is_ignored() -> TestResult {
    let mut sim = start_armock("teardown_twice");

    let response = sim.dut.srun("ps teardown\nps teardown\nms\n", 4)?;
    assert_eq!(response, "teardown\r\n10\r\n");
    assert_eq!(sim.dut.ereadline()?, "");
    assert_eq!(sim.dut.finish()?, ExitStatus::Exited(0));
    Ok(())
}

#[test]
fn end_of_input_stops_the_simulator() -> TestResult {
    let mut sim = start_armock("end_of_input");

    sim.dut.srun("pm 3 1\ndw 3 1\n", 0)?;
    assert_eq!(sim.dut.finish()?, ExitStatus::Exited(0));
    assert_eq!(sim.shm.pin(3), Some(0xff));
    Ok(())
}

#[test]
fn malformed_input_leaves_the_session_intact() -> TestResult {
    let mut sim = start_armock("malformed");

    sim.dut.srun("zz\npu 123foo\nps foo bar\n\n", 0)?;
    sim.dut.assert_srun("pu 0x10 16\n", "10\r\n4\r\n")?;

    sim.finish()?;
    Ok(())
}

#[test]
fn extra_argument_is_a_usage_error() -> TestResult {
    let mut dut = ProcessDut::spawn(&[env!("CARGO_BIN_EXE_armock"), "a", "b", "c"])?;

    let line = dut.ereadline()?;
    assert!(line.starts_with("armock: "), "{line:?}");
    assert!(line.contains("\"c\""), "{line:?}");
    assert_eq!(dut.finish()?, ExitStatus::Exited(1));
    Ok(())
}
