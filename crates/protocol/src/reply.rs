use core::fmt;

use crate::{
    checksum, DeviceId, FrameError, ReportingMode, WorkState, CMD_DEVICE_ID, CMD_FIRMWARE,
    CMD_QUERY, CMD_REPORTING_MODE, CMD_WORKING_PERIOD, CMD_WORK_STATE, HEAD, KIND_COMMAND,
    KIND_MEASUREMENT, MAX_WORKING_PERIOD, REPLY_LEN, TAIL,
};

/// One PM2.5/PM10 sample, in tenths of µg/m³ as sent on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub pm25_tenths: u16,
    pub pm10_tenths: u16,
}

impl Measurement {
    pub fn pm25(&self) -> f64 {
        f64::from(self.pm25_tenths) / 10.0
    }

    pub fn pm10(&self) -> f64 {
        f64::from(self.pm10_tenths) / 10.0
    }
}

/// Firmware build date reported by the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Firmware {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for Firmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "20{:02}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reply {
    Measurement(Measurement),
    ReportingMode(ReportingMode),
    /// Acknowledges a device id change; the new id is the frame's device.
    DeviceId,
    WorkState(WorkState),
    Firmware(Firmware),
    WorkingPeriod(u8),
}

impl Reply {
    /// Command id this reply answers.
    pub fn command(&self) -> u8 {
        match self {
            Reply::Measurement(_) => CMD_QUERY,
            Reply::ReportingMode(_) => CMD_REPORTING_MODE,
            Reply::DeviceId => CMD_DEVICE_ID,
            Reply::WorkState(_) => CMD_WORK_STATE,
            Reply::Firmware(_) => CMD_FIRMWARE,
            Reply::WorkingPeriod(_) => CMD_WORKING_PERIOD,
        }
    }
}

/// A decoded reply together with the address of the sensor that sent it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    pub device: DeviceId,
    pub reply: Reply,
}

impl Frame {
    pub fn decode(bytes: &[u8; REPLY_LEN]) -> Result<Self, FrameError> {
        if bytes[0] != HEAD {
            return Err(FrameError::Head(bytes[0]));
        }
        if bytes[9] != TAIL {
            return Err(FrameError::Tail(bytes[9]));
        }
        let actual = checksum(&bytes[2..8]);
        if actual != bytes[8] {
            return Err(FrameError::Checksum {
                expected: bytes[8],
                actual,
            });
        }

        let device = DeviceId::from_bytes(bytes[6], bytes[7]);
        let reply = match bytes[1] {
            KIND_MEASUREMENT => Reply::Measurement(Measurement {
                pm25_tenths: u16::from_le_bytes([bytes[2], bytes[3]]),
                pm10_tenths: u16::from_le_bytes([bytes[4], bytes[5]]),
            }),
            KIND_COMMAND => decode_command_reply(bytes)?,
            kind => return Err(FrameError::Kind(kind)),
        };

        Ok(Frame { device, reply })
    }
}

fn decode_command_reply(bytes: &[u8; REPLY_LEN]) -> Result<Reply, FrameError> {
    let command = bytes[2];
    let value = bytes[4];
    let out_of_range = FrameError::Value { command, value };

    let reply = match command {
        CMD_REPORTING_MODE => Reply::ReportingMode(match value {
            0 => ReportingMode::Active,
            1 => ReportingMode::Query,
            _ => return Err(out_of_range),
        }),
        CMD_DEVICE_ID => Reply::DeviceId,
        CMD_WORK_STATE => Reply::WorkState(match value {
            0 => WorkState::Sleeping,
            1 => WorkState::Working,
            _ => return Err(out_of_range),
        }),
        CMD_FIRMWARE => Reply::Firmware(Firmware {
            year: bytes[3],
            month: bytes[4],
            day: bytes[5],
        }),
        CMD_WORKING_PERIOD if value <= MAX_WORKING_PERIOD => Reply::WorkingPeriod(value),
        CMD_WORKING_PERIOD => return Err(out_of_range),
        other => return Err(FrameError::Command(other)),
    };
    Ok(reply)
}
