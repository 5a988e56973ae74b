//! HTTP delivery: `GET /airquality` reads the sensor once per request.

use std::io;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;

use crate::{report::Report, sensor::Sensor, station::Station};

pub const ROUTE: &str = "/airquality";

pub fn router<S: Sensor + Send + 'static>(station: Station<S>) -> Router {
    Router::new()
        .route(ROUTE, get(airquality::<S>))
        .with_state(station)
}

/// Serves until Ctrl-C.
pub async fn serve<S: Sensor + Send + 'static>(
    listener: TcpListener,
    station: Station<S>,
) -> io::Result<()> {
    axum::serve(listener, router(station))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn airquality<S: Sensor + Send + 'static>(State(station): State<Station<S>>) -> Response {
    match station.read().await {
        Ok(reading) => (StatusCode::OK, Json(Report::Reading(reading))).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, Json(Report::unavailable())).into_response(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(err) => {
            tracing::error!(%err, "cannot listen for ctrl-c, serving until killed");
            std::future::pending::<()>().await
        }
    }
}
