use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::payments::{PayOrderResponse, WebhookRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook))
}

/// Nested under /api/orders.
pub fn order_payment_router() -> Router<AppState> {
    Router::new().route("/{id}/pay", post(pay_order))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Open a hosted checkout session", body = ApiResponse<PayOrderResponse>),
        (status = 400, description = "Order is not pending"),
        (status = 404, description = "Not Found"),
        (status = 502, description = "Gateway unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PayOrderResponse>>> {
    let resp = payment_service::pay_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "Settle the referenced payment; replays are acknowledged", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Unknown reference"),
    ),
    tag = "Payments"
)]
pub async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = payment_service::handle_webhook(&state, payload).await?;
    Ok(Json(resp))
}
