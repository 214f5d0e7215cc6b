//! Baud rate values and named presets
//!
//! A target rate is given either as a plain integer or as the name of a
//! preset. Presets cover the "magic" rates that USB-CDC bootloaders watch
//! for when the host changes the line coding.

use crate::error::SwitchError;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Rate used when no target is given (DFU request on Particle devices)
pub const DEFAULT_TARGET_BAUD: u32 = 14400;

/// Rate the port is left at after the switch
pub const NEUTRAL_BAUD: u32 = 9600;

/// Port used when none is given
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// A serial line speed
///
/// Any integer is passed through to the serial library unchecked; 0 maps to
/// the B0 hang-up rate on POSIX, which some devices treat as a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawBaud")]
pub struct BaudRate(u32);

impl BaudRate {
    pub const fn new(rate: u32) -> Self {
        Self(rate)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn default_target() -> Self {
        Self(DEFAULT_TARGET_BAUD)
    }

    pub fn neutral() -> Self {
        Self(NEUTRAL_BAUD)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaudRate {
    type Err = SwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(rate) = s.parse::<u32>() {
            return Ok(Self::new(rate));
        }
        preset(s).ok_or_else(|| SwitchError::InvalidBaud(s.to_string()))
    }
}

/// Config files may spell a rate as `baud = 14400` or `baud = "dfu"`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBaud {
    Number(u32),
    Name(String),
}

impl TryFrom<RawBaud> for BaudRate {
    type Error = SwitchError;

    fn try_from(raw: RawBaud) -> Result<Self, Self::Error> {
        match raw {
            RawBaud::Number(rate) => Ok(Self::new(rate)),
            RawBaud::Name(name) => name.parse(),
        }
    }
}

/// Named magic baud rates
pub static PRESETS: Lazy<HashMap<&'static str, BaudRate>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("dfu", BaudRate(14400));
    m.insert("listen", BaudRate(28800));
    m.insert("listening", BaudRate(28800));
    m.insert("neutral", BaudRate(NEUTRAL_BAUD));
    m.insert("touch", BaudRate(1200));
    m.insert("arduino-reset", BaudRate(1200));
    m
});

/// Look up a preset by name (case-insensitive)
pub fn preset(name: &str) -> Option<BaudRate> {
    PRESETS.get(name.to_lowercase().as_str()).copied()
}

/// Preset names for help output, sorted
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PRESETS.keys().copied().collect();
    names.sort();
    names
}
