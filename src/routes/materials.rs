use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        items::{CreateMaterialRequest, ItemList, ItemWithTags, UpdateItemRequest},
        stock::{CreateMovementRequest, MovementCreated, MovementList},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Item, item_type},
    response::ApiResponse,
    routes::params::{ItemQuery, Pagination},
    services::{item_service, stock_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route(
            "/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/{id}/movements", get(list_movements).post(create_movement))
}

#[utoipa::path(
    get,
    path = "/api/materials",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price"),
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("tag_id" = Option<Uuid>, Query, description = "Filter by tag"),
        ("sort_by" = Option<String>, Query, description = "Sort column: created_at, price, name"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List materials", body = ApiResponse<ItemList>)
    ),
    tag = "Materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<ApiResponse<ItemList>>> {
    let resp = item_service::list_items(&state, item_type::MATERIAL, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Get material with tags", body = ApiResponse<ItemWithTags>),
        (status = 404, description = "Material not found"),
    ),
    tag = "Materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ItemWithTags>>> {
    let resp = item_service::get_item(&state, item_type::MATERIAL, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = CreateMaterialRequest,
    responses(
        (status = 200, description = "Create material", body = ApiResponse<Item>),
        (status = 403, description = "Supplier role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMaterialRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let resp = item_service::create_material(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated material", body = ApiResponse<Item>),
        (status = 403, description = "Not the owning supplier"),
        (status = 404, description = "Material not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let resp = item_service::update_item(&state, &user, item_type::MATERIAL, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Deleted material"),
        (status = 400, description = "Material is referenced by orders or products"),
        (status = 404, description = "Material not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = item_service::delete_item(&state, &user, item_type::MATERIAL, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/materials/{id}/movements",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    request_body = CreateMovementRequest,
    responses(
        (status = 200, description = "Append a ledger row and adjust stock", body = ApiResponse<MovementCreated>),
        (status = 400, description = "Bad movement or insufficient stock"),
        (status = 403, description = "Not the owning supplier"),
        (status = 404, description = "Material not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMovementRequest>,
) -> AppResult<Json<ApiResponse<MovementCreated>>> {
    let resp = stock_service::create_movement(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/materials/{id}/movements",
    params(
        ("id" = Uuid, Path, description = "Material ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Movement ledger, newest first", body = ApiResponse<MovementList>),
        (status = 403, description = "Not the owning supplier"),
        (status = 404, description = "Material not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MovementList>>> {
    let resp = stock_service::list_movements(&state, &user, id, pagination).await?;
    Ok(Json(resp))
}
