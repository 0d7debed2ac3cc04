use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{audit::log_access, middleware::auth::decode_token, state::AppState};

/// Best-effort user attribution: a bad or absent token logs as anonymous.
fn user_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?.trim();
    let claims = decode_token(token).ok()?;
    Uuid::parse_str(&claims.sub).ok()
}

pub async fn access_log(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let user_id = user_from_headers(request.headers());

    let response = next.run(request).await;

    let status = response.status().as_u16() as i32;
    let latency_ms = start.elapsed().as_millis() as i64;

    if let Err(err) = log_access(&state.pool, user_id, &method, &path, status, latency_ms).await {
        tracing::warn!(error = %err, "access log failed");
    }

    response
}
