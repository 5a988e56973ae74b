use std::{net::SocketAddr, time::Duration};

use clap::{Args, Parser, Subcommand};
use sds011_protocol::DeviceId;

use crate::{
    poll::DEFAULT_INTERVAL_SECS,
    port::{PortSelection, DEFAULT_PATTERN},
};

pub const DEFAULT_BAUD: u32 = 9600;
pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

/// Longest accepted poll interval, one day.
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Reads an SDS011 particulate matter sensor and reports PM2.5/PM10 as JSON.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub serial: SerialArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct SerialArgs {
    /// Serial device of the sensor, discovered from --pattern when omitted
    #[arg(long, short, global = true, env = "AIRQUALITY_PORT")]
    pub port: Option<String>,

    /// Device name prefix to discover, followed by a port number
    #[arg(long, global = true, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    #[arg(long, global = true, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// How long to wait for a single sensor reply, in milliseconds
    #[arg(long, global = true, default_value_t = 2000)]
    pub timeout_ms: u64,

    /// Only talk to the sensor with this hex id (e.g. A160), default all
    #[arg(long, global = true, value_parser = parse_device_id)]
    pub device_id: Option<DeviceId>,
}

fn parse_device_id(s: &str) -> Result<DeviceId, String> {
    let hex = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(hex, 16)
        .map(DeviceId)
        .map_err(|err| format!("not a 16 bit hex id: {err}"))
}

impl SerialArgs {
    pub fn selection(&self) -> PortSelection {
        match &self.port {
            Some(path) => PortSelection::Fixed(path.clone()),
            None => PortSelection::Discover {
                prefix: self.pattern.clone(),
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one JSON reading per interval to stdout
    Poll {
        /// Seconds between readings
        #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS))]
        interval: u64,

        /// Stop after this many readings
        #[arg(long)]
        count: Option<u64>,
    },
    /// Serve the latest reading at GET /airquality
    Serve {
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
    /// List the serial ports this machine can see
    ListPorts,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults_to_discovery_on_port_5000() {
        let cli = Cli::try_parse_from(["airquality", "serve"]).unwrap();
        assert_eq!(
            cli.serial.selection(),
            PortSelection::Discover {
                prefix: "/dev/ttyUSB".into()
            }
        );
        assert_eq!(cli.serial.baud, 9600);
        assert_eq!(cli.serial.timeout(), Duration::from_secs(2));
        let Command::Serve { addr } = cli.command else {
            panic!("expected serve, got {:?}", cli.command);
        };
        assert_eq!(addr, "0.0.0.0:5000".parse().unwrap());
    }

    #[test]
    fn fixed_port_and_poll_options() {
        let cli = Cli::try_parse_from([
            "airquality",
            "--port",
            "/dev/ttyS0",
            "poll",
            "--interval",
            "5",
            "--count",
            "3",
        ])
        .unwrap();
        assert_eq!(
            cli.serial.selection(),
            PortSelection::Fixed("/dev/ttyS0".into())
        );
        assert!(matches!(
            cli.command,
            Command::Poll {
                interval: 5,
                count: Some(3)
            }
        ));
    }

    #[test]
    fn serial_options_may_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["airquality", "poll", "-p", "/dev/ttyACM0", "--baud", "19200"])
            .unwrap();
        assert_eq!(cli.serial.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(cli.serial.baud, 19200);
        assert!(matches!(
            cli.command,
            Command::Poll {
                interval: 10,
                count: None
            }
        ));
    }

    #[test]
    fn interval_is_bounded() {
        assert!(Cli::try_parse_from(["airquality", "poll", "--interval", "0"]).is_err());
        assert!(Cli::try_parse_from(["airquality", "poll", "--interval", "86401"]).is_err());
        assert!(
            Cli::try_parse_from(["airquality", "poll", "--interval", u64::MAX.to_string().as_str()])
                .is_err()
        );
        assert!(Cli::try_parse_from(["airquality", "poll", "--interval", "86400"]).is_ok());
    }

    #[test]
    fn device_id_is_hex() {
        let cli = Cli::try_parse_from(["airquality", "serve", "--device-id", "A160"]).unwrap();
        assert_eq!(cli.serial.device_id, Some(DeviceId(0xA160)));
        let cli = Cli::try_parse_from(["airquality", "serve", "--device-id", "0x0001"]).unwrap();
        assert_eq!(cli.serial.device_id, Some(DeviceId(0x0001)));
        assert!(Cli::try_parse_from(["airquality", "serve", "--device-id", "zz"]).is_err());
        assert!(Cli::try_parse_from(["airquality", "serve", "--device-id", "12345"]).is_err());

        let cli = Cli::try_parse_from(["airquality", "serve"]).unwrap();
        assert_eq!(cli.serial.device_id, None);
    }

    #[test]
    fn help_carries_the_summary() {
        let about = Cli::command().get_about().map(ToString::to_string);
        assert!(about.is_some_and(|about| about.contains("SDS011")));
    }
}
