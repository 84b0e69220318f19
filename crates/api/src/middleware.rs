use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use cin_auth::{Gate, ResponseAction};

use crate::context::SessionContext;

/// Response header carrying the reason code when the gate lets a caller
/// through instead of redirecting them to the page they are already on.
pub const NOTICE_HEADER: HeaderName = HeaderName::from_static("x-cin-auth-notice");

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<Gate>,
    pub session_cookie: Arc<str>,
}

/// Runs the request gate in front of every downstream route.
pub async fn gate_middleware(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_token(req.headers(), &state.session_cookie);
    let action = state.gate.handle(token.as_deref(), req.uri().path());

    match action {
        ResponseAction::Continue { session, notice } => {
            let reason = notice.as_ref().and_then(|n| n.reason);
            req.extensions_mut()
                .insert(SessionContext::new(session, notice));

            let mut response = next.run(req).await;
            if let Some(reason) = reason {
                response
                    .headers_mut()
                    .insert(NOTICE_HEADER, HeaderValue::from_static(reason.as_str()));
            }
            response
        }
        ResponseAction::Redirect { location } => Redirect::to(&location).into_response(),
        ResponseAction::Unauthenticated { location } => {
            tracing::debug!(path = %req.uri().path(), "no usable session; sending to sign-in");
            Redirect::to(&location).into_response()
        }
    }
}

/// Bearer header first, then the session cookie.
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = extract_bearer(headers) {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
