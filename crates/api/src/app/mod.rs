//! HTTP application wiring (Axum router + gate middleware).
//!
//! - `routes/`: gated stand-in pages and RBAC audit endpoints
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use cin_auth::Gate;

use crate::config::ApiConfig;
use crate::middleware;

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with_gate(config, Gate::new(config.gate.clone()))
}

/// Same as [`build_app`] with a caller-supplied gate (custom route tables).
pub fn build_app_with_gate(config: &ApiConfig, gate: Gate) -> Router {
    let gate = Arc::new(gate);
    let gate_state = middleware::GateState {
        gate: gate.clone(),
        session_cookie: Arc::from(config.session_cookie.as_str()),
    };

    // Everything except health checks goes through the gate.
    let gated = routes::router()
        .layer(Extension(gate))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            gate_state,
            middleware::gate_middleware,
        )));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(gated)
}
