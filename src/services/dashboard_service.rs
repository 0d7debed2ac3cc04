use crate::{
    dto::dashboard::{
        AdminDashboard, MovementTotals, RoleCount, StatusCount, SupplierDashboard, TopProduct,
        TypeCount, VendorDashboard,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin, ensure_supplier, ensure_vendor},
    models::movement_type,
    response::ApiResponse,
    state::AppState,
};

const LOW_STOCK_THRESHOLD: i32 = 5;

pub async fn admin_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminDashboard>> {
    ensure_admin(user)?;

    let users_by_role = sqlx::query_as::<_, RoleCount>(
        "SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
    )
    .fetch_all(&state.pool)
    .await?;

    let orders_by_status = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status",
    )
    .fetch_all(&state.pool)
    .await?;

    let items_by_type = sqlx::query_as::<_, TypeCount>(
        "SELECT item_type, COUNT(*) AS count FROM items GROUP BY item_type ORDER BY item_type",
    )
    .fetch_all(&state.pool)
    .await?;

    let paid_revenue: (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_amount), 0)::BIGINT FROM orders WHERE status = 'paid'",
    )
    .fetch_one(&state.pool)
    .await?;

    let top_products = sqlx::query_as::<_, TopProduct>(
        r#"
        SELECT i.id AS item_id, i.name, COALESCE(SUM(oi.quantity), 0) AS units
        FROM order_items oi
        JOIN items i ON i.id = oi.item_id
        JOIN orders o ON o.id = oi.order_id
        WHERE o.status = 'paid'
        GROUP BY i.id, i.name
        ORDER BY units DESC
        LIMIT 5
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let data = AdminDashboard {
        users_by_role,
        orders_by_status,
        items_by_type,
        paid_revenue: paid_revenue.0,
        top_products,
    };
    Ok(ApiResponse::success("Admin dashboard", data, None))
}

pub async fn vendor_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<VendorDashboard>> {
    ensure_vendor(user)?;

    let product_count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM items WHERE owner_id = $1 AND item_type = 'product'",
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let materials_used: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(DISTINCT pm.material_id)
        FROM product_materials pm
        JOIN items p ON p.id = pm.product_id
        WHERE p.owner_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let sold: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(oi.quantity), 0),
               COALESCE(SUM(oi.price * oi.quantity), 0)::BIGINT
        FROM order_items oi
        JOIN items i ON i.id = oi.item_id
        JOIN orders o ON o.id = oi.order_id
        WHERE o.status = 'paid' AND i.owner_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let top_products = sqlx::query_as::<_, TopProduct>(
        r#"
        SELECT i.id AS item_id, i.name, COALESCE(SUM(oi.quantity), 0) AS units
        FROM order_items oi
        JOIN items i ON i.id = oi.item_id
        JOIN orders o ON o.id = oi.order_id
        WHERE o.status = 'paid' AND i.owner_id = $1
        GROUP BY i.id, i.name
        ORDER BY units DESC
        LIMIT 5
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let data = VendorDashboard {
        product_count: product_count.0,
        materials_used: materials_used.0,
        units_sold: sold.0,
        revenue: sold.1,
        top_products,
    };
    Ok(ApiResponse::success("Vendor dashboard", data, None))
}

pub async fn supplier_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SupplierDashboard>> {
    ensure_supplier(user)?;

    let material_count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM items WHERE owner_id = $1 AND item_type = 'material'",
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let stock_value: (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(price * stock), 0)::BIGINT
        FROM items
        WHERE owner_id = $1 AND item_type = 'material'
        "#,
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let low_stock_count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM items
        WHERE owner_id = $1 AND item_type = 'material' AND stock <= $2
        "#,
    )
    .bind(user.user_id)
    .bind(LOW_STOCK_THRESHOLD)
    .fetch_one(&state.pool)
    .await?;

    let movement_rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT sm.movement_type, COALESCE(SUM(sm.quantity), 0)::BIGINT
        FROM stock_movements sm
        JOIN items i ON i.id = sm.material_id
        WHERE i.owner_id = $1
        GROUP BY sm.movement_type
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let mut movements = MovementTotals {
        inbound: 0,
        outbound: 0,
    };
    for (kind, quantity) in movement_rows {
        if kind == movement_type::IN {
            movements.inbound = quantity;
        } else if kind == movement_type::OUT {
            movements.outbound = quantity;
        }
    }

    let favorites_received: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM material_favorites mf
        JOIN items i ON i.id = mf.material_id
        WHERE i.owner_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let data = SupplierDashboard {
        material_count: material_count.0,
        stock_value: stock_value.0,
        low_stock_count: low_stock_count.0,
        movements,
        favorites_received: favorites_received.0,
    };
    Ok(ApiResponse::success("Supplier dashboard", data, None))
}
