use anyhow::Context;
use armock::{
    command::{self, Device},
    communication,
    config::Config,
    peripherals::{PeripheralState, PIN_COUNT},
};
use shmregion::ShmRegion;
use simplelog as sl;

fn main() {
    let program_name = program_name();

    // stderr is the diagnostic channel, so this is the only place writing to it outside the protocol
    if let Err(e) = run(&program_name) {
        eprintln!("{program_name}: {e:#}");
        std::process::exit(1);
    }
}

fn run(program_name: &str) -> anyhow::Result<()> {
    let config = Config::from_env_and_args(std::env::args().skip(1))?;

    if let Some(path) = &config.log_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        let _ = sl::WriteLogger::init(config.level_filter()?, sl::Config::default(), file);
    }
    log::info!("Starting with {config:?}");

    let pins = ShmRegion::open(&config.pins, PIN_COUNT)
        .with_context(|| format!("opening /dev/shm/{}", config.pins))?;
    let eeprom = ShmRegion::open(&config.eeprom, config.eeprom_size)
        .with_context(|| format!("opening /dev/shm/{}", config.eeprom))?;

    let mut device = Device::new(PeripheralState::new(pins, eeprom)?).with_program_name(program_name);
    if config.clear_eeprom {
        device.state_mut().eeprom_clear();
    }

    match &config.serial {
        Some(serial) => {
            let mut com = communication::open_serial(&serial.path, serial.baudrate)?;
            command::serve(&mut com, &mut device)?;
        }
        None => command::serve(&mut communication::stdio(), &mut device)?,
    }

    Ok(())
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg| std::path::Path::new(arg).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "armock".into())
}
