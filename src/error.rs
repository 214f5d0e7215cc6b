//! Error types for the baud switch

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("invalid baud rate '{0}': expected an integer or a preset name")]
    InvalidBaud(String),

    #[error("failed to open {port} at {baud} baud")]
    Open {
        port: String,
        baud: u32,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, SwitchError>;
