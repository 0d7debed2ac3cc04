use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};
use uuid::Uuid;

use crate::{
    dto::items::{ItemWithTags, SetItemTagsRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/tags", put(set_item_tags))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}/tags",
    params(
        ("id" = Uuid, Path, description = "Item ID (product or material)")
    ),
    request_body = SetItemTagsRequest,
    responses(
        (status = 200, description = "Replace the item's tag set", body = ApiResponse<ItemWithTags>),
        (status = 400, description = "Unknown tag id"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tags"
)]
pub async fn set_item_tags(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetItemTagsRequest>,
) -> AppResult<Json<ApiResponse<ItemWithTags>>> {
    let resp = item_service::set_item_tags(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
