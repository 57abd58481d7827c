use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::auth::AdminPrincipal;
use crate::application::error::{ErrorReport, HttpError};

use super::{AdminState, repo_error_to_http};

/// Identity header set by the fronting authentication proxy. Authentication
/// mechanics live outside this service; the header value is the backend
/// user id and is resolved against the user directory.
pub const ADMIN_USER_HEADER: &str = "x-backend-user";

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Resolve the acting backend user and make it available as an
/// [`AdminPrincipal`] extension. Requests without a resolvable identity are
/// rejected before any handler runs.
pub async fn require_admin(
    State(state): State<AdminState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(ADMIN_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    let Some(user_id) = user_id else {
        return unauthorized("missing or malformed identity header");
    };

    match state.users.find_user(user_id).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(AdminPrincipal {
                user_id: user.id,
                display_name: user.display_name,
                is_god: user.is_god,
            });
            next.run(request).await
        }
        Ok(None) => unauthorized("unknown backend user"),
        Err(err) => repo_error_to_http("infra::http::require_admin", err).into_response(),
    }
}

fn unauthorized(detail: &'static str) -> Response {
    HttpError::new(
        "infra::http::require_admin",
        StatusCode::UNAUTHORIZED,
        "Authentication required",
        detail,
    )
    .into_response()
}

pub async fn log_responses(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let actor = request
        .extensions()
        .get::<AdminPrincipal>()
        .map(|principal| principal.display_name.clone());

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_client_error() || status.is_server_error() {
        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, messages) = match report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };

        if status.is_server_error() {
            error!(
                %method, %uri, status = status.as_u16(), elapsed_ms, request_id,
                actor = actor.as_deref(), source, messages = ?messages,
                "request failed"
            );
        } else {
            warn!(
                %method, %uri, status = status.as_u16(), elapsed_ms, request_id,
                actor = actor.as_deref(), source, messages = ?messages,
                "request rejected"
            );
        }
    } else {
        info!(
            %method, %uri, status = status.as_u16(), elapsed_ms, request_id,
            actor = actor.as_deref(),
            "request completed"
        );
    }

    response
}
