use crate::simulation::*;
use armock::harness::Dut;
use std::time::Duration;
use test_case::test_case;

fn millis(sim: &mut Simulation) -> anyhow::Result<u32> {
    Ok(sim.dut.srun("ms\n", 1)?.trim_end().parse()?)
}

#[test_case(50)]
#[test_case(100)]
#[test_case(200)]
fn millis_follow_wall_clock(delta: u32) -> TestResult {
    let mut sim = start_armock(&format!("millis_{delta}"));

    let start = millis(&mut sim)?;
    std::thread::sleep(Duration::from_millis(delta.into()));
    let elapsed = millis(&mut sim)? - start;

    assert!(elapsed >= delta, "{elapsed} < {delta}");
    // loose upper bound, scheduling delays on loaded machines are not an error
    assert!(elapsed < delta + 2000, "{elapsed} too far past {delta}");
    sim.finish()?;
    Ok(())
}
