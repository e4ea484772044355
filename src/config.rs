use std::path::{Path, PathBuf};

use crate::peripherals::DEFAULT_EEPROM_SIZE;

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE: &str = "config.toml";
/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "ARMOCK_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Shared memory object holding one byte per pin
    pub pins: String,
    /// Shared memory object holding the persistent memory
    pub eeprom: String,
    pub eeprom_size: usize,
    /// Zero the persistent memory before serving
    pub clear_eeprom: bool,
    /// Log file. Logging is disabled without one, stderr is reserved for diagnostics.
    pub log_path: Option<PathBuf>,
    pub log_level: String,
    /// Serve on a serial device instead of stdio
    pub serial: Option<SerialConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialConfig {
    pub path: String,
    #[serde(default = "default_baudrate")]
    pub baudrate: u32,
}

fn default_baudrate() -> u32 {
    115200
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pins: "armock_pins".into(),
            eeprom: "armock_eeprom".into(),
            eeprom_size: DEFAULT_EEPROM_SIZE,
            clear_eeprom: false,
            log_path: None,
            log_level: "info".into(),
            serial: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid log level {0:?}")]
    LogLevel(String),
    #[error("eeprom_size must not be zero")]
    EmptyEeprom,
    #[error("unexpected argument {0:?}, usage: armock [PINS] [EEPROM]")]
    Usage(String),
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(source) => Err(ConfigError::Io { path: path.into(), source }),
        }
    }

    /// Loads the config file named by [CONFIG_ENV], or [CONFIG_FILE], then applies the positional
    /// command line arguments `[PINS] [EEPROM]`.
    pub fn from_env_and_args(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from).unwrap_or(CONFIG_FILE.into());
        Self::load(path)?.with_args(args)
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut args = args.into_iter();
        if let Some(pins) = args.next() {
            self.pins = pins;
        }
        if let Some(eeprom) = args.next() {
            self.eeprom = eeprom;
        }
        if let Some(extra) = args.next() {
            return Err(ConfigError::Usage(extra));
        }
        Ok(self)
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level.parse().map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.eeprom_size == 0 {
            return Err(ConfigError::EmptyEeprom);
        }
        self.level_filter()?;
        Ok(())
    }
}
