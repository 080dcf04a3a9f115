//! Request handlers for the API endpoints.
//!
//! Every handler takes the simulation lock for exactly one user action, so
//! actions are atomic with respect to ticks.

use std::sync::{Arc, MutexGuard, PoisonError};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::types::{ErrorResponse, ParametersUpdate, PinState, StateResponse, pin_states};
use crate::io::export::{EXPORT_FILE_NAME, EXPORT_MIME, to_csv_string};
use crate::sim::gpio::GpioPin;
use crate::sim::{Sample, SharedSimulation, Simulation};

/// Locks the shared simulation, recovering from a poisoned lock.
pub(crate) fn lock(sim: &SharedSimulation) -> MutexGuard<'_, Simulation> {
    sim.lock().unwrap_or_else(PoisonError::into_inner)
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// `GET /state` → 200 + `StateResponse`
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse::from(&*lock(&state.simulation)))
}

/// `GET /history` → 200 + samples, oldest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<Sample>> {
    Json(lock(&state.simulation).history().to_vec())
}

/// `GET /gpio` → 200 + all pins
pub async fn get_gpio(State(state): State<Arc<AppState>>) -> Json<Vec<PinState>> {
    Json(pin_states(&lock(&state.simulation)))
}

/// `POST /gpio/{pin}/toggle` → 200 + new pin state, 400 + `ErrorResponse` for
/// anything that is not a pin in 2..=27
pub async fn toggle_pin(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Response {
    let pin = match raw.parse::<u8>() {
        Ok(number) => match GpioPin::try_from(number) {
            Ok(pin) => pin,
            Err(e) => return error(StatusCode::BAD_REQUEST, e.to_string()),
        },
        Err(_) => {
            return error(
                StatusCode::BAD_REQUEST,
                format!("\"{raw}\" is not a GPIO pin number (expected 2..=27)"),
            );
        }
    };
    let asserted = lock(&state.simulation).toggle_pin(pin);
    Json(PinState { pin, asserted }).into_response()
}

/// `POST /start`
pub async fn start(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let mut sim = lock(&state.simulation);
    sim.start();
    Json(StateResponse::from(&*sim))
}

/// `POST /pause`
pub async fn pause(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let mut sim = lock(&state.simulation);
    sim.pause();
    Json(StateResponse::from(&*sim))
}

/// `POST /reset`
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let mut sim = lock(&state.simulation);
    sim.reset();
    Json(StateResponse::from(&*sim))
}

/// `PUT /parameters` → 200 + state with the constrained values applied
pub async fn put_parameters(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ParametersUpdate>,
) -> Json<StateResponse> {
    let mut sim = lock(&state.simulation);
    if let Some(v) = update.voltage {
        sim.set_voltage(v);
    }
    if let Some(r) = update.resistance {
        sim.set_resistance(r);
    }
    Json(StateResponse::from(&*sim))
}

/// `GET /export` → 200 + CSV attachment, 500 if encoding fails
pub async fn get_export(State(state): State<Arc<AppState>>) -> Response {
    let doc = {
        let sim = lock(&state.simulation);
        to_csv_string(sim.history())
    };
    match doc {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, EXPORT_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "export failed");
            error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
