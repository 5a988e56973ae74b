//! Reads PM2.5/PM10 from a Nova SDS011 sensor on a serial line and reports
//! them as JSON, either as a line per interval on stdout or behind
//! `GET /airquality`.

pub mod config;
pub mod cycle;
pub mod error;
pub mod http;
pub mod poll;
pub mod port;
pub mod report;
pub mod sensor;
pub mod station;

pub use error::{ReadError, StartupError};
pub use report::{Reading, Report};
pub use sensor::{Sds011, Sensor, SensorError};
pub use station::Station;
