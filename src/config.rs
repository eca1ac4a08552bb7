//! User configuration loaded from `config.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "fincalc";
const CONFIG_FILE: &str = "config.toml";
const HISTORY_FILE: &str = "history.json";

/// Default risk-free rate, in percent.
pub const DEFAULT_RISK_FREE_RATE: f64 = 4.2;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Risk-free rate used by Black-Scholes and CAPM when none is given.
    pub risk_free_rate: f64,
    /// Where calculation history is stored.
    pub history_file: Option<PathBuf>,
    /// Log at debug level unless `RUST_LOG` says otherwise.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            history_file: None,
            debug: false,
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/fincalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the configuration at `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The configured history file, or `$XDG_DATA_HOME/fincalc/history.json`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR).join(HISTORY_FILE)))
    }
}
