//! Serial Switcher
//!
//! Resets a serial device by briefly opening its port at a "magic" baud
//! rate and then reopening it at a neutral 9600 baud.
//!
//! # Usage
//!
//! ```bash
//! # Request DFU mode on /dev/ttyACM0 (14400 baud)
//! serial-switcher
//!
//! # Request listening mode on another port
//! serial-switcher 28800 /dev/ttyACM1
//! serial-switcher listen /dev/ttyACM1
//!
//! # Read defaults from a config file
//! serial-switcher --config switcher.toml
//!
//! # List available serial ports
//! serial-switcher --list
//! ```

mod baud;
mod config;
mod error;
mod ports;
mod switcher;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use baud::{preset_names, BaudRate};
use config::{PartialSettings, Settings};
use switcher::SystemOpener;

/// Serial Switcher
///
/// Opens PORT at BAUD, closes it, then reopens and closes it at the neutral rate
#[derive(Parser)]
#[command(name = "serial-switcher")]
#[command(version)]
#[command(about = "Reset a serial device by toggling its port through a magic baud rate")]
#[command(after_help = presets_help())]
struct Cli {
    /// Target baud rate or preset name [default: 14400]
    baud: Option<BaudRate>,

    /// Serial port path [default: /dev/ttyACM0]
    port: Option<String>,

    /// Baud rate to leave the port at [default: 9600]
    #[arg(long, value_name = "RATE")]
    neutral_baud: Option<BaudRate>,

    /// Milliseconds to wait between the two opens [default: 0]
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// TOML file with defaults for port, baud, neutral_baud and settle_ms
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List available serial ports and exit
    #[arg(short, long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn presets_help() -> String {
    format!("Presets: {}", preset_names().join(", "))
}

/// Layer the command line over the config file over the defaults
fn resolve_settings(cli: Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => PartialSettings::load(path)?,
        None => PartialSettings::default(),
    };

    Ok(PartialSettings {
        port: cli.port,
        baud: cli.baud,
        neutral_baud: cli.neutral_baud,
        settle_ms: cli.settle_ms,
    }
    .or(file)
    .resolve())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.list {
        return ports::print_ports();
    }

    let settings = resolve_settings(cli)?;

    settings
        .to_switch()
        .run(&mut SystemOpener::default())
        .with_context(|| format!("Baud switch on {} failed", settings.port))?;

    info!(
        "{} switched via {} baud, left at {}",
        settings.port, settings.target, settings.neutral
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn config_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_order() {
        let cli = Cli::try_parse_from(["serial-switcher", "28800", "/dev/ttyACM3"]).unwrap();
        assert_eq!(cli.baud.map(BaudRate::get), Some(28800));
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyACM3"));
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["serial-switcher"]).unwrap();
        assert!(cli.baud.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.list);
    }

    #[test]
    fn test_preset_argument() {
        let cli = Cli::try_parse_from(["serial-switcher", "dfu"]).unwrap();
        assert_eq!(cli.baud.map(BaudRate::get), Some(14400));
    }

    #[test]
    fn test_bad_baud_rejected() {
        assert!(Cli::try_parse_from(["serial-switcher", "fast"]).is_err());
        assert!(Cli::try_parse_from(["serial-switcher", "-5"]).is_err());
    }

    #[test]
    fn test_extra_argument_rejected() {
        assert!(Cli::try_parse_from(["serial-switcher", "14400", "/dev/ttyACM0", "extra"]).is_err());
    }

    #[test]
    fn test_zero_baud_accepted() {
        let cli = Cli::try_parse_from(["serial-switcher", "0", "/dev/ttyACM0"]).unwrap();
        let settings = resolve_settings(cli).unwrap();
        assert_eq!(settings.target.get(), 0);
        assert_eq!(settings.neutral.get(), 9600);
        assert_eq!(settings.port, "/dev/ttyACM0");
    }

    #[test]
    fn test_settings_defaults() {
        let cli = Cli::try_parse_from(["serial-switcher"]).unwrap();
        let settings = resolve_settings(cli).unwrap();
        assert_eq!(settings.port, "/dev/ttyACM0");
        assert_eq!(settings.target.get(), 14400);
        assert_eq!(settings.neutral.get(), 9600);
        assert_eq!(settings.settle, Duration::ZERO);
    }

    #[test]
    fn test_positionals_override_config() {
        let file = config_file(&[
            "port = \"/dev/ttyACM7\"",
            "baud = 1200",
            "neutral_baud = 19200",
            "settle_ms = 20",
        ]);
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "serial-switcher",
            "28800",
            "/dev/ttyACM1",
            "--neutral-baud",
            "4800",
            "--settle-ms",
            "5",
            "--config",
            path,
        ])
        .unwrap();

        let settings = resolve_settings(cli).unwrap();
        assert_eq!(settings.port, "/dev/ttyACM1");
        assert_eq!(settings.target.get(), 28800);
        assert_eq!(settings.neutral.get(), 4800);
        assert_eq!(settings.settle, Duration::from_millis(5));
    }

    #[test]
    fn test_config_fills_omitted_values() {
        let file = config_file(&[
            "port = \"/dev/ttyACM7\"",
            "baud = \"listen\"",
            "neutral_baud = 19200",
            "settle_ms = 20",
        ]);
        let path = file.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["serial-switcher", "-c", path]).unwrap();
        let settings = resolve_settings(cli).unwrap();
        assert_eq!(settings.port, "/dev/ttyACM7");
        assert_eq!(settings.target.get(), 28800);
        assert_eq!(settings.neutral.get(), 19200);
        assert_eq!(settings.settle, Duration::from_millis(20));

        let cli = Cli::try_parse_from(["serial-switcher", "dfu", "-c", path]).unwrap();
        let settings = resolve_settings(cli).unwrap();
        assert_eq!(settings.port, "/dev/ttyACM7");
        assert_eq!(settings.target.get(), 14400);
        assert_eq!(settings.neutral.get(), 19200);
    }

    #[test]
    fn test_bad_config_reported() {
        let cli = Cli::try_parse_from(["serial-switcher", "-c", "/nonexistent/switcher.toml"])
            .unwrap();
        assert!(resolve_settings(cli).is_err());
    }
}
