//! One wake, query, sleep sequence against the sensor.

use crate::{error::ReadError, report::Reading, sensor::Sensor};

/// Puts the sensor back to sleep when dropped, including during unwinding.
struct Awake<'a, S: Sensor + ?Sized> {
    sensor: &'a mut S,
}

impl<S: Sensor + ?Sized> Drop for Awake<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.sensor.set_sleep(true) {
            tracing::warn!(%err, "could not put sensor back to sleep");
        }
    }
}

/// Wakes the sensor, takes one measurement and puts it to sleep again.
///
/// The sensor is sent to sleep on every path out of here. A failed sleep
/// after a good measurement is only logged; the reading is still returned.
pub fn read<S: Sensor + ?Sized>(sensor: &mut S) -> Result<Reading, ReadError> {
    let result = wake_and_query(sensor);
    match &result {
        Ok(reading) => {
            tracing::debug!(pm25 = reading.pm25, pm10 = reading.pm10, "read data")
        }
        Err(err) => tracing::error!(%err, "error reading from sensor"),
    }
    result
}

fn wake_and_query<S: Sensor + ?Sized>(sensor: &mut S) -> Result<Reading, ReadError> {
    let mut awake = Awake { sensor };
    awake.sensor.set_sleep(false).map_err(ReadError::Wake)?;
    let measurement = awake.sensor.query().map_err(ReadError::Query)?;
    Ok(Reading::from(measurement))
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        panic::{self, AssertUnwindSafe},
    };

    use sds011_protocol::{FrameError, Measurement};

    use super::*;
    use crate::sensor::SensorError;

    enum Answer {
        Value(u16, u16),
        Fail,
        Garbled,
        Panic,
    }

    struct Fake {
        answer: Answer,
        sleeping: bool,
        wake_fails: bool,
        sleep_fails: bool,
        sleep_calls: usize,
    }

    impl Fake {
        fn answering(answer: Answer) -> Self {
            Fake {
                answer,
                sleeping: true,
                wake_fails: false,
                sleep_fails: false,
                sleep_calls: 0,
            }
        }
    }

    impl Sensor for Fake {
        fn set_sleep(&mut self, sleep: bool) -> Result<(), SensorError> {
            if sleep {
                self.sleep_calls += 1;
                if self.sleep_fails {
                    return Err(io::Error::from(io::ErrorKind::TimedOut).into());
                }
            } else if self.wake_fails {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe).into());
            }
            self.sleeping = sleep;
            Ok(())
        }

        fn query(&mut self) -> Result<Measurement, SensorError> {
            assert!(!self.sleeping, "queried a sleeping sensor");
            match self.answer {
                Answer::Value(pm25_tenths, pm10_tenths) => Ok(Measurement {
                    pm25_tenths,
                    pm10_tenths,
                }),
                Answer::Fail => Err(io::Error::from(io::ErrorKind::TimedOut).into()),
                Answer::Garbled => Err(FrameError::Kind(0x42).into()),
                Answer::Panic => panic!("sensor library blew up"),
            }
        }

        fn is_sleeping(&self) -> bool {
            self.sleeping
        }
    }

    #[test]
    fn success_returns_reading_and_sleeps() {
        for (a, b) in [(0, 0), (123, 201), (9999, 65535)] {
            let mut sensor = Fake::answering(Answer::Value(a, b));
            let reading = read(&mut sensor).unwrap();
            assert_eq!(reading.pm25, f64::from(a) / 10.0);
            assert_eq!(reading.pm10, f64::from(b) / 10.0);
            assert!(sensor.is_sleeping());
            assert_eq!(sensor.sleep_calls, 1);
        }
    }

    #[test]
    fn failed_query_still_sleeps() {
        let mut sensor = Fake::answering(Answer::Fail);
        assert!(matches!(read(&mut sensor), Err(ReadError::Query(SensorError::Io(_)))));
        assert!(sensor.is_sleeping());
    }

    #[test]
    fn malformed_reply_is_a_failure() {
        let mut sensor = Fake::answering(Answer::Garbled);
        assert!(matches!(
            read(&mut sensor),
            Err(ReadError::Query(SensorError::Frame(_)))
        ));
        assert!(sensor.is_sleeping());
    }

    #[test]
    fn failed_wake_still_attempts_sleep() {
        let mut sensor = Fake::answering(Answer::Value(1, 2));
        sensor.wake_fails = true;
        assert!(matches!(read(&mut sensor), Err(ReadError::Wake(_))));
        assert_eq!(sensor.sleep_calls, 1);
        assert!(sensor.is_sleeping());
    }

    #[test]
    fn panicking_query_still_sleeps() {
        let mut sensor = Fake::answering(Answer::Panic);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| read(&mut sensor)));
        assert!(outcome.is_err());
        assert!(sensor.is_sleeping());
        assert_eq!(sensor.sleep_calls, 1);
    }

    #[test]
    fn failed_sleep_keeps_the_reading() {
        let mut sensor = Fake::answering(Answer::Value(50, 70));
        sensor.sleep_fails = true;
        let reading = read(&mut sensor).unwrap();
        assert_eq!(reading, Reading { pm25: 5.0, pm10: 7.0 });
        assert_eq!(sensor.sleep_calls, 1);
    }
}
