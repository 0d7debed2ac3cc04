use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::invitations::{AcceptInvitationRequest, CreateInvitationRequest, InvitationList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Invitation, User},
    response::ApiResponse,
    routes::params::Pagination,
    services::invitation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invitations).post(create_invitation))
        .route("/accept", post(accept_invitation))
}

#[utoipa::path(
    post,
    path = "/api/invitations",
    request_body = CreateInvitationRequest,
    responses(
        (status = 200, description = "Create a vendor/supplier invitation and mail the accept link", body = ApiResponse<Invitation>),
        (status = 400, description = "Bad role or email already registered"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Invitations"
)]
pub async fn create_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInvitationRequest>,
) -> AppResult<Json<ApiResponse<Invitation>>> {
    let resp = invitation_service::create_invitation(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/invitations",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List invitations", body = ApiResponse<InvitationList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Invitations"
)]
pub async fn list_invitations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<InvitationList>>> {
    let resp = invitation_service::list_invitations(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/invitations/accept",
    request_body = AcceptInvitationRequest,
    responses(
        (status = 200, description = "Redeem a single-use token and create the account", body = ApiResponse<User>),
        (status = 400, description = "Token used or expired"),
        (status = 404, description = "Unknown token"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Invitations"
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(payload): Json<AcceptInvitationRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = invitation_service::accept_invitation(&state, payload).await?;
    Ok(Json(resp))
}
