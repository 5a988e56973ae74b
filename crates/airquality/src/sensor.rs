use std::io::{self, Read, Write};

use sds011_protocol::{
    Command, DeviceId, Firmware, Frame, FrameError, FrameReader, Measurement, Reply,
    ReportingMode, WorkState, REPLY_LEN,
};

/// Bytes read while waiting for one reply before giving up. Leaves room for
/// a handful of unrelated frames, e.g. measurements pushed in active mode.
const READ_BUDGET: usize = REPLY_LEN * 10;

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("serial I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed reply: {0}")]
    Frame(#[from] FrameError),
    #[error("no reply to command {command:#04x}")]
    NoReply { command: u8 },
}

/// A particulate sensor session that can be woken, queried and put to sleep.
pub trait Sensor {
    fn set_sleep(&mut self, sleep: bool) -> Result<(), SensorError>;

    /// Blocks until the sensor answers with one measurement.
    fn query(&mut self) -> Result<Measurement, SensorError>;

    fn is_sleeping(&self) -> bool;
}

/// SDS011 driver over any byte stream, normally an open serial port.
pub struct Sds011<P> {
    port: P,
    device: DeviceId,
    reader: FrameReader,
    sleeping: bool,
}

impl<P: Read + Write> Sds011<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            device: DeviceId::ALL,
            reader: FrameReader::new(),
            sleeping: false,
        }
    }

    /// Only talk to the sensor with this address.
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = device;
        self
    }

    /// Switches the sensor to query mode and leaves it asleep.
    pub fn init(&mut self) -> Result<Firmware, SensorError> {
        self.set_sleep(false)?;
        self.set_reporting_mode(ReportingMode::Query)?;
        let firmware = self.firmware()?;
        self.set_sleep(true)?;
        Ok(firmware)
    }

    pub fn set_reporting_mode(&mut self, mode: ReportingMode) -> Result<(), SensorError> {
        let confirmed = self.transact(Command::SetReportingMode(mode), |reply| match reply {
            Reply::ReportingMode(mode) => Some(mode),
            _ => None,
        })?;
        tracing::debug!(?confirmed, "reporting mode set");
        Ok(())
    }

    pub fn firmware(&mut self) -> Result<Firmware, SensorError> {
        self.transact(Command::Firmware, |reply| match reply {
            Reply::Firmware(firmware) => Some(firmware),
            _ => None,
        })
    }

    /// Sends `command` and waits for the first reply `pick` accepts.
    fn transact<T>(
        &mut self,
        command: Command,
        pick: impl Fn(Reply) -> Option<T>,
    ) -> Result<T, SensorError> {
        self.reader.reset();
        self.port.write_all(&command.encode(self.device))?;
        self.port.flush()?;

        let mut byte = [0u8; 1];
        for _ in 0..READ_BUDGET {
            self.port.read_exact(&mut byte)?;
            let Some(raw) = self.reader.push(byte[0]) else {
                continue;
            };
            let frame = Frame::decode(&raw)?;
            if self.device.accepts(frame.device) {
                if let Some(value) = pick(frame.reply) {
                    return Ok(value);
                }
            }
            tracing::trace!(?frame, command = command.id(), "skipping unrelated frame");
        }

        Err(SensorError::NoReply {
            command: command.id(),
        })
    }
}

impl<P: Read + Write> Sensor for Sds011<P> {
    fn set_sleep(&mut self, sleep: bool) -> Result<(), SensorError> {
        let wanted = if sleep {
            WorkState::Sleeping
        } else {
            WorkState::Working
        };
        // a late ack for the opposite state is stale, keep waiting
        self.transact(Command::SetWorkState(wanted), |reply| match reply {
            Reply::WorkState(state) if state == wanted => Some(()),
            _ => None,
        })?;
        self.sleeping = sleep;
        Ok(())
    }

    fn query(&mut self) -> Result<Measurement, SensorError> {
        self.transact(Command::Query, |reply| match reply {
            Reply::Measurement(measurement) => Some(measurement),
            _ => None,
        })
    }

    fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}
