use std::sync::{Arc, Mutex, PoisonError};

use crate::{cycle, error::ReadError, report::Reading, sensor::Sensor};

/// Process-wide handle to the one physical sensor.
///
/// Every read cycle runs under the lock, so overlapping callers queue up
/// instead of interleaving wake/query/sleep commands on the serial line.
pub struct Station<S> {
    sensor: Arc<Mutex<S>>,
}

impl<S> Clone for Station<S> {
    fn clone(&self) -> Self {
        Self {
            sensor: Arc::clone(&self.sensor),
        }
    }
}

impl<S: Sensor + Send + 'static> Station<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor: Arc::new(Mutex::new(sensor)),
        }
    }

    /// Runs one read cycle on the blocking pool.
    pub async fn read(&self) -> Result<Reading, ReadError> {
        let sensor = Arc::clone(&self.sensor);
        let outcome = tokio::task::spawn_blocking(move || {
            // a panicked cycle already tried to put the sensor to sleep
            let mut sensor = sensor.lock().unwrap_or_else(PoisonError::into_inner);
            cycle::read(&mut *sensor)
        })
        .await;

        match outcome {
            Ok(result) => result,
            Err(join) => {
                let err = ReadError::from(join);
                tracing::error!(%err, "error reading from sensor");
                Err(err)
            }
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sensor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_sleeping()
    }
}
