//! Wire format of the Nova SDS011 particulate matter sensor.
//!
//! The host sends 19 byte command frames and the sensor answers with 10 byte
//! reply frames. Both are framed by `0xAA .. 0xAB` and carry an 8 bit
//! additive checksum over the data bytes.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod command;
mod reader;
mod reply;

pub use command::Command;
pub use reader::FrameReader;
pub use reply::{Firmware, Frame, Measurement, Reply};

pub const HEAD: u8 = 0xAA;
pub const TAIL: u8 = 0xAB;

pub const COMMAND_LEN: usize = 19;
pub const REPLY_LEN: usize = 10;

const COMMAND_KIND: u8 = 0xB4;
const KIND_MEASUREMENT: u8 = 0xC0;
const KIND_COMMAND: u8 = 0xC5;

const CMD_REPORTING_MODE: u8 = 0x02;
const CMD_QUERY: u8 = 0x04;
const CMD_DEVICE_ID: u8 = 0x05;
const CMD_WORK_STATE: u8 = 0x06;
const CMD_FIRMWARE: u8 = 0x07;
const CMD_WORKING_PERIOD: u8 = 0x08;

/// Longest working period the sensor accepts, in minutes.
pub const MAX_WORKING_PERIOD: u8 = 30;

/// Two byte sensor address. Commands sent to [`DeviceId::ALL`] are accepted
/// by every sensor on the line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u16);

impl DeviceId {
    pub const ALL: DeviceId = DeviceId(0xFFFF);

    fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    fn from_bytes(hi: u8, lo: u8) -> Self {
        DeviceId(u16::from_be_bytes([hi, lo]))
    }

    /// Whether a reply from `other` answers a command addressed to `self`.
    pub fn accepts(self, other: DeviceId) -> bool {
        self == DeviceId::ALL || self == other
    }
}

/// How the sensor delivers measurements.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportingMode {
    /// Sensor pushes a measurement every working period.
    Active,
    /// Sensor only answers explicit query commands.
    Query,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WorkState {
    Sleeping,
    Working,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame starts with {0:#04x} instead of 0xaa")]
    Head(u8),
    #[error("frame ends with {0:#04x} instead of 0xab")]
    Tail(u8),
    #[error("checksum mismatch: frame says {expected:#04x}, data sums to {actual:#04x}")]
    Checksum { expected: u8, actual: u8 },
    #[error("unknown reply kind {0:#04x}")]
    Kind(u8),
    #[error("reply echoes unknown command {0:#04x}")]
    Command(u8),
    #[error("value {value} out of range for command {command:#04x}")]
    Value { command: u8, value: u8 },
}

fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}
