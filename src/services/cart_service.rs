use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, AdjustQuantityRequest, CartDto, CartLine},
    entity::{
        items::Entity as Items,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::{Item, OrderItem, item_type, order_status},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct CartRow {
    line_id: Uuid,
    quantity: i32,
    line_price: i64,
    item_id: Uuid,
    item_type: String,
    owner_id: Uuid,
    category_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    price: i64,
    stock: i32,
    unit: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_line(self) -> CartLine {
        CartLine {
            id: self.line_id,
            quantity: self.quantity,
            price: self.line_price,
            item: Item {
                id: self.item_id,
                item_type: self.item_type,
                owner_id: self.owner_id,
                category_id: self.category_id,
                name: self.name,
                description: self.description,
                price: self.price,
                stock: self.stock,
                unit: self.unit,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

/// The caller's draft order, rendered with item data. A user with no draft
/// order simply has an empty cart.
pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartDto>> {
    ensure_customer(user)?;

    let draft = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Status.eq(order_status::DRAFT)),
        )
        .one(&state.orm)
        .await?;

    let order = match draft {
        Some(o) => o,
        None => {
            let empty = CartDto {
                order_id: None,
                items: Vec::new(),
                total: 0,
            };
            return Ok(ApiResponse::success("OK", empty, Some(Meta::empty())));
        }
    };

    let rows = sqlx::query_as::<_, CartRow>(
        r#"
        SELECT oi.id AS line_id, oi.quantity, oi.price AS line_price,
               i.id AS item_id, i.item_type, i.owner_id, i.category_id, i.name,
               i.description, i.price, i.stock, i.unit, i.created_at, i.updated_at
        FROM order_items oi
        JOIN items i ON i.id = oi.item_id
        WHERE oi.order_id = $1
        ORDER BY oi.created_at
        "#,
    )
    .bind(order.id)
    .fetch_all(&state.pool)
    .await?;

    let items: Vec<CartLine> = rows.into_iter().map(CartRow::into_line).collect();
    let total = items
        .iter()
        .map(|line| line.price * line.quantity as i64)
        .sum();

    let cart = CartDto {
        order_id: Some(order.id),
        items,
        total,
    };
    Ok(ApiResponse::success("OK", cart, Some(Meta::empty())))
}

/// Find-or-create the draft order, find-or-create the line, bump quantity
/// by one.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<OrderItem>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;

    let item = Items::find_by_id(payload.item_id).one(&txn).await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::BadRequest("item not found".to_string())),
    };
    if item.item_type != item_type::PRODUCT {
        return Err(AppError::BadRequest(
            "only products can be added to the cart".to_string(),
        ));
    }

    let draft = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Status.eq(order_status::DRAFT)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let order = match draft {
        Some(o) => o,
        None => {
            OrderActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                status: Set(order_status::DRAFT.to_string()),
                total_amount: Set(0),
                invoice_number: Set(None),
                paid_at: Set(None),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };

    let existing = OrderItems::find()
        .filter(
            Condition::all()
                .add(OrderItemCol::OrderId.eq(order.id))
                .add(OrderItemCol::ItemId.eq(item.id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let line = match existing {
        Some(line) => {
            let new_quantity = line.quantity + 1;
            let mut active: OrderItemActive = line.into();
            active.quantity = Set(new_quantity);
            active.update(&txn).await?
        }
        None => {
            OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                item_id: Set(item.id),
                quantity: Set(1),
                price: Set(item.price),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("order_items"),
        Some(serde_json::json!({ "item_id": item.id, "order_id": line.order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", OrderItem::from(line), None))
}

/// Adjust a cart line by a signed delta. A result of zero or less is
/// rejected and the line left untouched.
pub async fn adjust_quantity(
    state: &AppState,
    user: &AuthUser,
    order_item_id: Uuid,
    payload: AdjustQuantityRequest,
) -> AppResult<ApiResponse<OrderItem>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;

    let line = find_draft_line(&txn, user, order_item_id).await?;

    let new_quantity = line.quantity + payload.delta;
    if new_quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must stay greater than 0".to_string(),
        ));
    }

    let mut active: OrderItemActive = line.into();
    active.quantity = Set(new_quantity);
    let line = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_adjust",
        Some("order_items"),
        Some(serde_json::json!({ "order_item_id": order_item_id, "delta": payload.delta })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", OrderItem::from(line), None))
}

pub async fn remove_line(
    state: &AppState,
    user: &AuthUser,
    order_item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;

    let line = find_draft_line(&txn, user, order_item_id).await?;
    OrderItems::delete_by_id(line.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("order_items"),
        Some(serde_json::json!({ "order_item_id": order_item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// A cart line is only reachable through the caller's own draft order.
async fn find_draft_line(
    txn: &sea_orm::DatabaseTransaction,
    user: &AuthUser,
    order_item_id: Uuid,
) -> AppResult<crate::entity::order_items::Model> {
    let line = OrderItems::find_by_id(order_item_id)
        .lock(LockType::Update)
        .one(txn)
        .await?;
    let line = match line {
        Some(l) => l,
        None => return Err(AppError::NotFound),
    };

    let order = Orders::find_by_id(line.order_id).one(txn).await?;
    match order {
        Some(o) if o.user_id == user.user_id && o.status == order_status::DRAFT => Ok(line),
        _ => Err(AppError::NotFound),
    }
}
