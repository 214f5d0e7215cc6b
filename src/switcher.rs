//! The baud switch itself
//!
//! Opening a USB-CDC port sends the requested line coding to the device.
//! Bootloaders that watch for a magic rate act on the first open; the
//! second open at the neutral rate leaves the port in a harmless state.

use crate::baud::BaudRate;
use crate::error::{Result, SwitchError};
use log::debug;
use serialport::SerialPort;
use std::time::Duration;

/// Access to serial ports, split out so the sequence can be observed in tests
pub trait PortOpener {
    type Handle;

    fn open(&mut self, path: &str, baud: BaudRate) -> Result<Self::Handle>;

    fn close(&mut self, handle: Self::Handle);
}

/// Opens real ports through the `serialport` crate
#[derive(Debug, Clone)]
pub struct SystemOpener {
    timeout: Duration,
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(100),
        }
    }
}

impl PortOpener for SystemOpener {
    type Handle = Box<dyn SerialPort>;

    fn open(&mut self, path: &str, baud: BaudRate) -> Result<Self::Handle> {
        serialport::new(path, baud.get())
            .timeout(self.timeout)
            .open()
            .map_err(|source| SwitchError::Open {
                port: path.to_string(),
                baud: baud.get(),
                source,
            })
    }

    fn close(&mut self, handle: Self::Handle) {
        drop(handle);
    }
}

/// One planned switch: target rate first, then the neutral rate
#[derive(Debug, Clone, PartialEq)]
pub struct BaudSwitch {
    pub port: String,
    pub target: BaudRate,
    pub neutral: BaudRate,
    /// Pause between closing the first handle and opening the second
    pub settle: Duration,
}

impl BaudSwitch {
    pub fn new(port: &str, target: BaudRate) -> Self {
        Self {
            port: port.to_string(),
            target,
            neutral: BaudRate::neutral(),
            settle: Duration::ZERO,
        }
    }

    pub fn with_neutral(mut self, neutral: BaudRate) -> Self {
        self.neutral = neutral;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Open and close at the target rate, then again at the neutral rate.
    ///
    /// Stops at the first failure; a failed first open never reaches the
    /// second one.
    pub fn run<O: PortOpener>(&self, opener: &mut O) -> Result<()> {
        debug!(
            "Switching {} to {} baud, then back to {}",
            self.port, self.target, self.neutral
        );

        self.toggle(opener, self.target)?;

        if !self.settle.is_zero() {
            debug!("Waiting {:?} before reopening", self.settle);
            std::thread::sleep(self.settle);
        }

        self.toggle(opener, self.neutral)
    }

    fn toggle<O: PortOpener>(&self, opener: &mut O, baud: BaudRate) -> Result<()> {
        debug!("Opening {} at {} baud", self.port, baud);
        let handle = opener.open(&self.port, baud)?;
        debug!("Closing {}", self.port);
        opener.close(handle);
        Ok(())
    }
}
