#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use airquality::{Sensor, SensorError};
use sds011_protocol::Measurement;

#[derive(Default)]
pub struct Log {
    pub wakes: usize,
    pub awake_now: usize,
    pub max_awake: usize,
}

/// Sensor stand-in answering from a script of `Some((pm25, pm10))` readings
/// in tenths, or `None` for a failed query.
pub struct MockSensor {
    script: VecDeque<Option<(u16, u16)>>,
    sleeping: bool,
    latency: Duration,
    panic_next: bool,
    log: Arc<Mutex<Log>>,
}

impl MockSensor {
    pub fn scripted(script: impl IntoIterator<Item = Option<(u16, u16)>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            sleeping: true,
            latency: Duration::ZERO,
            panic_next: false,
            log: Arc::default(),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The next query panics instead of answering.
    pub fn panicking_once(mut self) -> Self {
        self.panic_next = true;
        self
    }

    pub fn log(&self) -> Arc<Mutex<Log>> {
        Arc::clone(&self.log)
    }
}

impl Sensor for MockSensor {
    fn set_sleep(&mut self, sleep: bool) -> Result<(), SensorError> {
        let mut log = self.log.lock().unwrap();
        if sleep && !self.sleeping {
            log.awake_now -= 1;
        } else if !sleep && self.sleeping {
            log.wakes += 1;
            log.awake_now += 1;
            log.max_awake = log.max_awake.max(log.awake_now);
        }
        self.sleeping = sleep;
        Ok(())
    }

    fn query(&mut self) -> Result<Measurement, SensorError> {
        assert!(!self.sleeping, "queried a sleeping sensor");
        thread::sleep(self.latency);
        if std::mem::take(&mut self.panic_next) {
            panic!("sensor driver panicked mid-query");
        }
        match self.script.pop_front().flatten() {
            Some((pm25_tenths, pm10_tenths)) => Ok(Measurement {
                pm25_tenths,
                pm10_tenths,
            }),
            None => Err(io::Error::new(io::ErrorKind::TimedOut, "no reply").into()),
        }
    }

    fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}
