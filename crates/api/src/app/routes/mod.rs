use axum::{routing::get, Router};

pub mod rbac;
pub mod session;
pub mod system;

/// Router for every gated path. Unknown paths fall through to [`session::page`].
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(session::whoami))
        .nest("/rbac", rbac::router())
        .fallback(session::page)
}
