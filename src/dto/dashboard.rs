use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct TypeCount {
    pub item_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct TopProduct {
    pub item_id: Uuid,
    pub name: String,
    pub units: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementTotals {
    pub inbound: i64,
    pub outbound: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub users_by_role: Vec<RoleCount>,
    pub orders_by_status: Vec<StatusCount>,
    pub items_by_type: Vec<TypeCount>,
    pub paid_revenue: i64,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDashboard {
    pub product_count: i64,
    pub materials_used: i64,
    pub units_sold: i64,
    pub revenue: i64,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierDashboard {
    pub material_count: i64,
    pub stock_value: i64,
    pub low_stock_count: i64,
    pub movements: MovementTotals,
    pub favorites_received: i64,
}
