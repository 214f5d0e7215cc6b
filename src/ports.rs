//! Serial port discovery for `--list`

use anyhow::{Context, Result};
use colored::Colorize;
use serialport::SerialPortType;

/// Information about a detected serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub path: String,
    pub port_type: PortType,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PortType {
    Usb,
    Pci,
    Bluetooth,
    Unknown,
}

impl std::fmt::Display for PortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortType::Usb => write!(f, "USB"),
            PortType::Pci => write!(f, "PCI"),
            PortType::Bluetooth => write!(f, "Bluetooth"),
            PortType::Unknown => write!(f, "Unknown"),
        }
    }
}

impl PortInfo {
    /// Whether the port looks like a USB CDC-ACM device, the kind that
    /// reacts to baud rate changes
    pub fn is_cdc_acm(&self) -> bool {
        if self.port_type != PortType::Usb && self.port_type != PortType::Unknown {
            return false;
        }
        self.path.contains("ttyACM")
            || self.path.contains("usbmodem")
            || (self.path.starts_with("COM") && self.port_type == PortType::Usb)
    }
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(p: serialport::SerialPortInfo) -> Self {
        let (port_type, manufacturer, product, serial_number, vid, pid) = match p.port_type {
            SerialPortType::UsbPort(info) => (
                PortType::Usb,
                info.manufacturer,
                info.product,
                info.serial_number,
                Some(info.vid),
                Some(info.pid),
            ),
            SerialPortType::PciPort => (PortType::Pci, None, None, None, None, None),
            SerialPortType::BluetoothPort => (PortType::Bluetooth, None, None, None, None, None),
            SerialPortType::Unknown => (PortType::Unknown, None, None, None, None, None),
        };

        PortInfo {
            path: p.port_name,
            port_type,
            manufacturer,
            product,
            serial_number,
            vid,
            pid,
        }
    }
}

/// List all available serial ports
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}

/// Print the available ports, CDC-ACM candidates first
pub fn print_ports() -> Result<()> {
    let mut ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("\n{}", "Troubleshooting tips:".cyan().bold());
        println!("  1. Connect the device over USB");
        println!("  2. Check if it is recognized: ls -la /dev/ttyACM*");
        println!("  3. Add your user to the 'dialout' group: sudo usermod -aG dialout $USER");
        return Ok(());
    }

    ports.sort_by_key(|p| !p.is_cdc_acm());

    println!("{}", "Available Serial Ports:".green().bold());
    println!("{}", "=".repeat(60));

    for port in &ports {
        let marker = if port.is_cdc_acm() {
            "[*]".cyan().bold()
        } else {
            "[ ]".dimmed()
        };
        println!("\n{} {}", marker, port.path.white().bold());
        println!("    Type: {}", port.port_type);

        if let Some(ref mfg) = port.manufacturer {
            println!("    Manufacturer: {}", mfg);
        }
        if let Some(ref prod) = port.product {
            println!("    Product: {}", prod);
        }
        if let Some(ref sn) = port.serial_number {
            println!("    Serial: {}", sn);
        }
        if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
            println!("    VID:PID: {:04x}:{:04x}", vid, pid);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "{}",
        "Ports marked [*] are CDC-ACM devices. Use: serial-switcher <BAUD> <PORT>".yellow()
    );

    Ok(())
}
