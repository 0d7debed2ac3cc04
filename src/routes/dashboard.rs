use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{AdminDashboard, SupplierDashboard, VendorDashboard},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_dashboard))
        .route("/vendor", get(vendor_dashboard))
        .route("/supplier", get(supplier_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    responses(
        (status = 200, description = "Marketplace-wide aggregates", body = ApiResponse<AdminDashboard>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminDashboard>>> {
    let resp = dashboard_service::admin_dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/vendor",
    responses(
        (status = 200, description = "Sales aggregates for the vendor's products", body = ApiResponse<VendorDashboard>),
        (status = 403, description = "Vendor only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn vendor_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<VendorDashboard>>> {
    let resp = dashboard_service::vendor_dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/supplier",
    responses(
        (status = 200, description = "Inventory aggregates for the supplier's materials", body = ApiResponse<SupplierDashboard>),
        (status = 403, description = "Supplier only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboards"
)]
pub async fn supplier_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SupplierDashboard>>> {
    let resp = dashboard_service::supplier_dashboard(&state, &user).await?;
    Ok(Json(resp))
}
