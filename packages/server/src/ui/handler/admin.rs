//! Admin control plane handlers.
//!
//! Every route sits behind [`require_bearer`], which runs before the method
//! check: a valid credential with a method other than POST on stop/restart
//! gets 405, an invalid one gets 401/403 regardless of method.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::{
    control::ProcessStatus,
    ui::{error::AdminError, state::AdminState},
};

/// Bearer token check for the admin routes
///
/// - No `Authorization` header or no `Bearer ` prefix → 401
/// - Token (trimmed) different from the configured secret → 403
pub async fn require_bearer(
    State(state): State<Arc<AdminState>>,
    req: Request,
    next: Next,
) -> Result<Response, AdminError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::debug!("Admin request without bearer credential");
            AdminError::Unauthorized
        })?;

    if token.trim() != state.token.expose_secret() {
        tracing::warn!("Admin request with wrong credential: {} {}", req.method(), req.uri());
        return Err(AdminError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// `/admin/status`
///
/// Read-only, so any method is served once authenticated.
pub async fn status(State(state): State<Arc<AdminState>>) -> Json<ProcessStatus> {
    Json(state.status.snapshot())
}

/// `POST /admin/stop`
pub async fn stop(
    State(state): State<Arc<AdminState>>,
    method: Method,
) -> Result<(StatusCode, &'static str), AdminError> {
    if method != Method::POST {
        return Err(AdminError::MethodNotAllowed);
    }
    state.control.request_stop();
    tracing::info!("Stop requested via admin endpoint");
    Ok((StatusCode::ACCEPTED, "stopping\n"))
}

/// `POST /admin/restart`
pub async fn restart(
    State(state): State<Arc<AdminState>>,
    method: Method,
) -> Result<(StatusCode, &'static str), AdminError> {
    if method != Method::POST {
        return Err(AdminError::MethodNotAllowed);
    }
    state.control.request_restart();
    tracing::info!("Restart requested via admin endpoint");
    Ok((StatusCode::ACCEPTED, "restarting\n"))
}
