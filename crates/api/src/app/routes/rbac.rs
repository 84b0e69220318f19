//! RBAC audit endpoints for transparent authorization debugging.
//!
//! These answer "why was I sent back to the dashboard?" for the current
//! session, and list the route policy the gate enforces.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use cin_auth::{Gate, explain_with};

use crate::app::errors;
use crate::context::SessionContext;

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub path: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/routes", get(list_routes))
        .route("/explain", get(explain_path))
}

/// GET /rbac/routes - the route permission table, sorted by path
pub async fn list_routes(Extension(gate): Extension<Arc<Gate>>) -> axum::response::Response {
    let routes = gate.table().entries();
    (StatusCode::OK, Json(serde_json::json!({ "routes": routes }))).into_response()
}

/// GET /rbac/explain?path=X - explain the decision the current session gets for X
pub async fn explain_path(
    Extension(gate): Extension<Arc<Gate>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ExplainQuery>,
) -> axum::response::Response {
    let Some(path) = query.path.filter(|p| p.starts_with('/')) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_path",
            "query parameter 'path' must be an absolute path",
        );
    };

    let claims = ctx.session().map(|s| &s.claims);
    let explanation = explain_with(gate.table(), claims, &path);

    (StatusCode::OK, Json(serde_json::json!({ "explanation": explanation }))).into_response()
}
