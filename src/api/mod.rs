//! REST API over a live simulation.
//!
//! Endpoints:
//! - `GET /state`, `GET /history`, `GET /gpio`, `GET /export`
//! - `POST /start`, `POST /pause`, `POST /reset`
//! - `PUT /parameters`, `POST /gpio/{pin}/toggle`

mod handlers;
mod ticker;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};

use crate::sim::SharedSimulation;

pub use ticker::{TickerHandle, spawn_ticker};
pub use types::{ErrorResponse, IdealReadout, ParametersUpdate, PinState, StateResponse};

/// State shared across all request handlers and the background ticker.
pub struct AppState {
    /// The live simulation behind its single lock.
    pub simulation: SharedSimulation,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/history", get(handlers::get_history))
        .route("/gpio", get(handlers::get_gpio))
        .route("/gpio/{pin}/toggle", post(handlers::toggle_pin))
        .route("/start", post(handlers::start))
        .route("/pause", post(handlers::pause))
        .route("/reset", post(handlers::reset))
        .route("/parameters", put(handlers::put_parameters))
        .route("/export", get(handlers::get_export))
        .with_state(state)
}

/// Starts the tick task, binds to `addr` and serves the API until shutdown.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr, tick_period: Duration) -> io::Result<()> {
    let _ticker = spawn_ticker(state.simulation.clone(), tick_period);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, router(state)).await
}
