use std::{error::Error, io, process::ExitCode, time::Duration};

use airquality::{
    config::{Cli, Command, SerialArgs},
    http, poll, port, Sds011, StartupError, Station,
};
use clap::Parser;
use serialport::SerialPort;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout is reserved for readings
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::ListPorts => list_ports()?,
        Command::Poll { interval, count } => {
            let station = connect(&cli.serial)?;
            poll::run(
                &station,
                &mut io::stdout(),
                Duration::from_secs(interval),
                count,
            )
            .await?;
        }
        Command::Serve { addr } => {
            let station = connect(&cli.serial)?;
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| StartupError::Bind { addr, source })?;
            tracing::info!(%addr, route = http::ROUTE, "listening");
            http::serve(listener, station).await?;
        }
    }
    Ok(())
}

fn connect(args: &SerialArgs) -> Result<Station<Sds011<Box<dyn SerialPort>>>, StartupError> {
    let path = args.selection().resolve()?;
    tracing::info!(%path, baud = args.baud, "opening serial port");
    let mut sensor = Sds011::new(port::open(&path, args.baud, args.timeout())?);
    if let Some(device) = args.device_id {
        sensor = sensor.with_device(device);
    }
    let firmware = sensor.init()?;
    tracing::info!(%firmware, "SDS011 sensor initialized");
    Ok(Station::new(sensor))
}

fn list_ports() -> Result<(), StartupError> {
    let ports = serialport::available_ports().map_err(StartupError::Enumerate)?;
    println!("Available serial ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in &ports {
        println!("  {}", port::describe(port));
    }
    Ok(())
}
