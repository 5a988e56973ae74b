//! Loop delivery: one JSON line per interval.

use std::{
    io::{self, Write},
    time::Duration,
};

use tokio::time::MissedTickBehavior;

use crate::{report::Report, sensor::Sensor, station::Station};

pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Reads the sensor every `every` and writes the outcome to `out`.
///
/// Runs until `count` lines have been written, or forever when `count` is
/// `None`. Read failures become `{"error": ...}` lines; only a failing
/// `out` ends the loop early.
pub async fn run<S, W>(
    station: &Station<S>,
    out: &mut W,
    every: Duration,
    count: Option<u64>,
) -> io::Result<()>
where
    S: Sensor + Send + 'static,
    W: Write,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut written = 0u64;
    while count.map_or(true, |n| written < n) {
        ticker.tick().await;
        let report = Report::from(&station.read().await);
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
        out.flush()?;
        written += 1;
    }
    Ok(())
}
