//! Stand-ins for downstream pages: they only echo what the gate established.

use axum::{
    extract::Extension,
    http::Uri,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use cin_auth::Diagnostics;

use crate::context::SessionContext;

/// GET /whoami - the caller's session as the gate resolved it
pub async fn whoami(Extension(ctx): Extension<SessionContext>) -> impl IntoResponse {
    let Some(session) = ctx.session() else {
        return Json(json!({ "authenticated": false }));
    };

    let organizations: Vec<_> = session
        .claims
        .organizations
        .iter()
        .map(|m| {
            json!({
                "organization_id": m.organization_id,
                "organization_name": m.organization_name,
            })
        })
        .collect();

    Json(json!({
        "authenticated": true,
        "subject": session.claims.subject,
        "active_organization_id": session.claims.active_organization_id,
        "organizations": organizations,
        "roles": session.roles,
        "privileges": session.privileges,
        "notice": ctx.notice().map(notice_json),
    }))
}

/// Fallback for every other gated path: acknowledges the pass-through.
pub async fn page(uri: Uri, Extension(ctx): Extension<SessionContext>) -> impl IntoResponse {
    let session = ctx.session();
    Json(json!({
        "path": uri.path(),
        "organization_id": session.and_then(|s| s.claims.active_organization_id.clone()),
        "privileges": session.map(|s| s.privileges.clone()).unwrap_or_default(),
        "notice": ctx.notice().map(notice_json),
    }))
}

fn notice_json(notice: &Diagnostics) -> serde_json::Value {
    json!({
        "error": notice.reason,
        "required_role": notice.required_roles,
        "required_privileges": notice.required_privileges,
    })
}
