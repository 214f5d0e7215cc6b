//! Settings resolution
//!
//! Each value comes from the command line first, then the optional TOML
//! config file, then the built-in default.
//!
//! ```toml
//! port = "/dev/ttyACM1"
//! baud = "listen"
//! neutral_baud = 9600
//! settle_ms = 250
//! ```

use crate::baud::{BaudRate, DEFAULT_PORT};
use crate::error::{Result, SwitchError};
use crate::switcher::BaudSwitch;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Settings that may be left unspecified at one layer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub port: Option<String>,
    pub baud: Option<BaudRate>,
    pub neutral_baud: Option<BaudRate>,
    pub settle_ms: Option<u64>,
}

impl PartialSettings {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SwitchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| SwitchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill unset values from a lower-priority layer
    pub fn or(self, lower: PartialSettings) -> Self {
        Self {
            port: self.port.or(lower.port),
            baud: self.baud.or(lower.baud),
            neutral_baud: self.neutral_baud.or(lower.neutral_baud),
            settle_ms: self.settle_ms.or(lower.settle_ms),
        }
    }

    /// Fill whatever is still unset from the built-in defaults
    pub fn resolve(self) -> Settings {
        Settings {
            port: self.port.unwrap_or_else(|| DEFAULT_PORT.to_string()),
            target: self.baud.unwrap_or_else(BaudRate::default_target),
            neutral: self.neutral_baud.unwrap_or_else(BaudRate::neutral),
            settle: Duration::from_millis(self.settle_ms.unwrap_or(0)),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: String,
    pub target: BaudRate,
    pub neutral: BaudRate,
    pub settle: Duration,
}

impl Settings {
    pub fn to_switch(&self) -> BaudSwitch {
        BaudSwitch::new(&self.port, self.target)
            .with_neutral(self.neutral)
            .with_settle(self.settle)
    }
}
