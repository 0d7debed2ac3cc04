use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::stock::{CreateMovementRequest, MovementCreated, MovementList},
    entity::{
        items::{ActiveModel as ItemActive, Entity as Items},
        stock_movements::{
            ActiveModel as MovementActive, Column as MovementCol, Entity as StockMovements,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_supplier},
    models::{Item, StockMovement, item_type, movement_type, role},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Append a ledger row and adjust the material's stock in one transaction.
/// The material row is locked so concurrent movements serialize; an "out"
/// movement larger than the current stock is rejected.
pub async fn create_movement(
    state: &AppState,
    user: &AuthUser,
    material_id: Uuid,
    payload: CreateMovementRequest,
) -> AppResult<ApiResponse<MovementCreated>> {
    ensure_supplier(user)?;

    if payload.movement_type != movement_type::IN && payload.movement_type != movement_type::OUT {
        return Err(AppError::BadRequest(
            "movement_type must be \"in\" or \"out\"".to_string(),
        ));
    }
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;

    let material = Items::find_by_id(material_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let material = match material {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    if material.item_type != item_type::MATERIAL {
        return Err(AppError::BadRequest(
            "stock movements apply to materials only".to_string(),
        ));
    }
    if user.role != role::ADMIN && material.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let new_stock = if payload.movement_type == movement_type::IN {
        material.stock + payload.quantity
    } else {
        if material.stock < payload.quantity {
            return Err(AppError::BadRequest(format!(
                "insufficient stock: {} available, {} requested",
                material.stock, payload.quantity
            )));
        }
        material.stock - payload.quantity
    };

    let movement = MovementActive {
        id: Set(Uuid::new_v4()),
        material_id: Set(material.id),
        user_id: Set(user.user_id),
        movement_type: Set(payload.movement_type.clone()),
        quantity: Set(payload.quantity),
        note: Set(payload.note.clone()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut active: ItemActive = material.into();
    active.stock = Set(new_stock);
    active.updated_at = Set(Utc::now().into());
    let material = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "stock_movement",
        Some("stock_movements"),
        Some(serde_json::json!({
            "material_id": material.id,
            "movement_type": payload.movement_type,
            "quantity": payload.quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Movement recorded",
        MovementCreated {
            movement: StockMovement::from(movement),
            material: Item::from(material),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_movements(
    state: &AppState,
    user: &AuthUser,
    material_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<MovementList>> {
    ensure_supplier(user)?;

    let material = Items::find_by_id(material_id).one(&state.orm).await?;
    let material = match material {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    if material.item_type != item_type::MATERIAL {
        return Err(AppError::NotFound);
    }
    if user.role != role::ADMIN && material.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let (page, limit, offset) = pagination.normalize();

    let finder = StockMovements::find()
        .filter(MovementCol::MaterialId.eq(material_id))
        .order_by_desc(MovementCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(StockMovement::from)
        .collect();

    Ok(ApiResponse::paginated(
        "OK",
        MovementList { items },
        page,
        limit,
        total,
    ))
}
