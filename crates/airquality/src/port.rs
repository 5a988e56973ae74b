//! Picks the serial device the sensor is attached to.

use std::time::Duration;

use serialport::{SerialPort, SerialPortInfo, SerialPortType};

use crate::error::StartupError;

/// USB-serial adapters show up as `/dev/ttyUSB0`, `/dev/ttyUSB1`, ...
pub const DEFAULT_PATTERN: &str = "/dev/ttyUSB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelection {
    /// Used as given, without checking that it exists.
    Fixed(String),
    /// First enumerated port named `<prefix><digits>`.
    Discover { prefix: String },
}

impl PortSelection {
    /// Enumerates serial ports only in discovery mode.
    pub fn resolve(&self) -> Result<String, StartupError> {
        let ports = match self {
            PortSelection::Fixed(_) => Vec::new(),
            PortSelection::Discover { .. } => {
                serialport::available_ports().map_err(StartupError::Enumerate)?
            }
        };
        self.resolve_from(&ports)
    }

    pub fn resolve_from(&self, ports: &[SerialPortInfo]) -> Result<String, StartupError> {
        match self {
            PortSelection::Fixed(path) => Ok(path.clone()),
            PortSelection::Discover { prefix } => {
                tracing::debug!(count = ports.len(), %prefix, "scanning serial ports");
                first_match(ports.iter().map(|p| p.port_name.as_str()), prefix).ok_or_else(|| {
                    StartupError::NoDevice {
                        prefix: prefix.clone(),
                    }
                })
            }
        }
    }
}

/// First name made of `prefix` followed by a port number, in the given order.
pub fn first_match<I, S>(names: I, prefix: &str) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .find(|name| is_numbered(name.as_ref(), prefix))
        .map(|name| name.as_ref().to_owned())
}

fn is_numbered(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

pub fn open(path: &str, baud: u32, timeout: Duration) -> Result<Box<dyn SerialPort>, StartupError> {
    serialport::new(path, baud)
        .timeout(timeout)
        .open()
        .map_err(|source| StartupError::Open {
            path: path.to_owned(),
            source,
        })
}

/// One line summary of a port for `list-ports`.
pub fn describe(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(info) => {
            let mut line = format!(
                "{} - USB (VID: 0x{:04x}, PID: 0x{:04x})",
                port.port_name, info.vid, info.pid
            );
            for detail in [&info.manufacturer, &info.product].into_iter().flatten() {
                line.push_str(", ");
                line.push_str(detail);
            }
            line
        }
        SerialPortType::PciPort => format!("{} - PCI", port.port_name),
        SerialPortType::BluetoothPort => format!("{} - Bluetooth", port.port_name),
        SerialPortType::Unknown => format!("{} - Unknown", port.port_name),
    }
}
