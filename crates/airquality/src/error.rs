use std::{io, net::SocketAddr};

use crate::sensor::SensorError;

/// Failure of a single read cycle. The process keeps running.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("could not wake sensor: {0}")]
    Wake(#[source] SensorError),
    #[error("sensor query failed: {0}")]
    Query(#[source] SensorError),
    #[error("read cycle aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// Failure before the sensor is ready to serve. Fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),
    #[error("no serial device matching {prefix}<N> found")]
    NoDevice { prefix: String },
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to initialize sensor: {0}")]
    Init(#[from] SensorError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}
