use sds011_protocol::Measurement;
use serde::Serialize;

/// Body sent whenever a read cycle fails.
pub const UNAVAILABLE: &str = "Could not retrieve sensor data";

/// PM concentrations in µg/m³.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub pm25: f64,
    pub pm10: f64,
}

impl From<Measurement> for Reading {
    fn from(m: Measurement) -> Self {
        Reading {
            pm25: m.pm25(),
            pm10: m.pm10(),
        }
    }
}

/// What gets written out for one read cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Reading(Reading),
    Error { error: &'static str },
}

impl Report {
    pub fn unavailable() -> Self {
        Report::Error { error: UNAVAILABLE }
    }
}

impl<E> From<&Result<Reading, E>> for Report {
    fn from(result: &Result<Reading, E>) -> Self {
        match result {
            Ok(reading) => Report::Reading(*reading),
            Err(_) => Report::unavailable(),
        }
    }
}
