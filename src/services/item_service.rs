use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::items::{
        CompositionLine, CompositionList, CreateMaterialRequest, CreateProductRequest, ItemList,
        ItemWithTags, SetCompositionRequest, SetItemTagsRequest, UpdateItemRequest,
    },
    entity::{
        categories::Entity as Categories,
        item_tags::{ActiveModel as ItemTagActive, Column as ItemTagCol, Entity as ItemTags},
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        product_materials::{
            ActiveModel as CompositionActive, Column as CompositionCol, Entity as ProductMaterials,
        },
        tags::{Column as TagCol, Entity as Tags},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_supplier, ensure_vendor},
    models::{Item, Tag, item_type, role},
    response::{ApiResponse, Meta},
    routes::params::{ItemQuery, ItemSortBy, SortOrder},
    state::AppState,
};

pub async fn list_items(
    state: &AppState,
    wanted_type: &str,
    query: ItemQuery,
) -> AppResult<ApiResponse<ItemList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(ItemCol::ItemType.eq(wanted_type));

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(ItemCol::Name).ilike(pattern.clone()))
                .add(Expr::col(ItemCol::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(ItemCol::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(ItemCol::Price.lte(max_price));
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(ItemCol::CategoryId.eq(category_id));
    }

    if let Some(tag_id) = query.tag_id {
        let tagged: Vec<Uuid> = ItemTags::find()
            .filter(ItemTagCol::TagId.eq(tag_id))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|link| link.item_id)
            .collect();
        if tagged.is_empty() {
            let meta = Meta::new(page, limit, 0);
            return Ok(ApiResponse::success(
                "Items",
                ItemList { items: Vec::new() },
                Some(meta),
            ));
        }
        condition = condition.add(ItemCol::Id.is_in(tagged));
    }

    let sort_by = query.sort_by.unwrap_or(ItemSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ItemSortBy::CreatedAt => ItemCol::CreatedAt,
        ItemSortBy::Price => ItemCol::Price,
        ItemSortBy::Name => ItemCol::Name,
    };

    let mut finder = Items::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Item::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Items", ItemList { items }, Some(meta)))
}

pub async fn get_item(
    state: &AppState,
    wanted_type: &str,
    id: Uuid,
) -> AppResult<ApiResponse<ItemWithTags>> {
    let item = Items::find_by_id(id).one(&state.orm).await?;
    let item = match item {
        Some(i) if i.item_type == wanted_type => i,
        _ => return Err(AppError::NotFound),
    };

    let tags = fetch_tags(state, item.id).await?;

    Ok(ApiResponse::success(
        "Item",
        ItemWithTags {
            item: Item::from(item),
            tags,
        },
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_vendor(user)?;
    create_item(
        state,
        user,
        item_type::PRODUCT,
        payload.name,
        payload.description,
        payload.price,
        None,
        payload.category_id,
    )
    .await
}

pub async fn create_material(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMaterialRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_supplier(user)?;
    create_item(
        state,
        user,
        item_type::MATERIAL,
        payload.name,
        payload.description,
        payload.price,
        payload.unit,
        payload.category_id,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn create_item(
    state: &AppState,
    user: &AuthUser,
    wanted_type: &str,
    name: String,
    description: Option<String>,
    price: i64,
    unit: Option<String>,
    category_id: Option<Uuid>,
) -> AppResult<ApiResponse<Item>> {
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if let Some(category_id) = category_id {
        let category = Categories::find_by_id(category_id).one(&state.orm).await?;
        if category.is_none() {
            return Err(AppError::BadRequest("category not found".into()));
        }
    }

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        item_type: Set(wanted_type.to_string()),
        owner_id: Set(user.user_id),
        category_id: Set(category_id),
        name: Set(name),
        description: Set(description),
        price: Set(price),
        stock: Set(0),
        unit: Set(unit),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_create",
        Some("items"),
        Some(serde_json::json!({ "item_id": item.id, "item_type": item.item_type })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item created",
        Item::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    wanted_type: &str,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    let existing = find_owned(state, user, wanted_type, id).await?;

    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
    }
    if let Some(category_id) = payload.category_id {
        let category = Categories::find_by_id(category_id).one(&state.orm).await?;
        if category.is_none() {
            return Err(AppError::BadRequest("category not found".into()));
        }
    }

    let mut active: ItemActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(Some(unit));
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    active.updated_at = Set(Utc::now().into());

    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_update",
        Some("items"),
        Some(serde_json::json!({ "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        Item::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    wanted_type: &str,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let item = find_owned(state, user, wanted_type, id).await?;

    let ordered = OrderItems::find()
        .filter(OrderItemCol::ItemId.eq(item.id))
        .count(&state.orm)
        .await?;
    if ordered > 0 {
        return Err(AppError::BadRequest(
            "item is referenced by orders and cannot be deleted".into(),
        ));
    }

    if item.item_type == item_type::MATERIAL {
        let used = ProductMaterials::find()
            .filter(CompositionCol::MaterialId.eq(item.id))
            .count(&state.orm)
            .await?;
        if used > 0 {
            return Err(AppError::BadRequest(
                "material is used by products and cannot be deleted".into(),
            ));
        }
    }

    Items::delete_by_id(item.id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_delete",
        Some("items"),
        Some(serde_json::json!({ "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Replace an item's tag set, applied as a diff over the link table.
pub async fn set_item_tags(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SetItemTagsRequest,
) -> AppResult<ApiResponse<ItemWithTags>> {
    let item = Items::find_by_id(id).one(&state.orm).await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    if user.role != role::ADMIN && item.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let desired: HashSet<Uuid> = payload.tag_ids.iter().copied().collect();

    if !desired.is_empty() {
        let known = Tags::find()
            .filter(TagCol::Id.is_in(desired.iter().copied().collect::<Vec<_>>()))
            .count(&state.orm)
            .await?;
        if known as usize != desired.len() {
            return Err(AppError::BadRequest("unknown tag id".into()));
        }
    }

    let txn = state.orm.begin().await?;

    let current: HashSet<Uuid> = ItemTags::find()
        .filter(ItemTagCol::ItemId.eq(item.id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|link| link.tag_id)
        .collect();

    let to_add: Vec<ItemTagActive> = desired
        .difference(&current)
        .map(|tag_id| ItemTagActive {
            item_id: Set(item.id),
            tag_id: Set(*tag_id),
        })
        .collect();
    if !to_add.is_empty() {
        ItemTags::insert_many(to_add).exec(&txn).await?;
    }

    let to_remove: Vec<Uuid> = current.difference(&desired).copied().collect();
    if !to_remove.is_empty() {
        ItemTags::delete_many()
            .filter(ItemTagCol::ItemId.eq(item.id))
            .filter(ItemTagCol::TagId.is_in(to_remove))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_tags_set",
        Some("item_tags"),
        Some(serde_json::json!({ "item_id": item.id, "tags": payload.tag_ids })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let tags = fetch_tags(state, item.id).await?;
    Ok(ApiResponse::success(
        "Tags updated",
        ItemWithTags {
            item: Item::from(item),
            tags,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_composition(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<CompositionList>> {
    let product = Items::find_by_id(product_id).one(&state.orm).await?;
    match product {
        Some(p) if p.item_type == item_type::PRODUCT => {}
        _ => return Err(AppError::NotFound),
    }

    let rows = ProductMaterials::find()
        .filter(CompositionCol::ProductId.eq(product_id))
        .all(&state.orm)
        .await?;

    let material_ids: Vec<Uuid> = rows.iter().map(|row| row.material_id).collect();
    let mut materials: HashMap<Uuid, Item> = HashMap::new();
    if !material_ids.is_empty() {
        for material in Items::find()
            .filter(ItemCol::Id.is_in(material_ids))
            .all(&state.orm)
            .await?
        {
            materials.insert(material.id, Item::from(material));
        }
    }

    let items = rows
        .into_iter()
        .filter_map(|row| {
            materials.remove(&row.material_id).map(|material| CompositionLine {
                material,
                quantity: row.quantity,
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "Composition",
        CompositionList { items },
        None,
    ))
}

/// Replace a product's bill of materials, applied as a diff: new rows
/// inserted, changed quantities updated, dropped rows deleted.
pub async fn set_composition(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: SetCompositionRequest,
) -> AppResult<ApiResponse<CompositionList>> {
    ensure_vendor(user)?;

    let product = Items::find_by_id(product_id).one(&state.orm).await?;
    let product = match product {
        Some(p) if p.item_type == item_type::PRODUCT => p,
        _ => return Err(AppError::NotFound),
    };
    if user.role != role::ADMIN && product.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let mut desired: HashMap<Uuid, i32> = HashMap::new();
    for entry in &payload.materials {
        if entry.quantity <= 0 {
            return Err(AppError::BadRequest(
                "composition quantity must be greater than 0".into(),
            ));
        }
        if desired.insert(entry.material_id, entry.quantity).is_some() {
            return Err(AppError::BadRequest("duplicate material in payload".into()));
        }
    }

    if !desired.is_empty() {
        let known = Items::find()
            .filter(ItemCol::Id.is_in(desired.keys().copied().collect::<Vec<_>>()))
            .filter(ItemCol::ItemType.eq(item_type::MATERIAL))
            .count(&state.orm)
            .await?;
        if known as usize != desired.len() {
            return Err(AppError::BadRequest("unknown material id".into()));
        }
    }

    let txn = state.orm.begin().await?;

    let current = ProductMaterials::find()
        .filter(CompositionCol::ProductId.eq(product.id))
        .all(&txn)
        .await?;

    let current_ids: HashSet<Uuid> = current.iter().map(|row| row.material_id).collect();

    for row in &current {
        match desired.get(&row.material_id) {
            Some(&quantity) if quantity != row.quantity => {
                ProductMaterials::update_many()
                    .col_expr(CompositionCol::Quantity, Expr::value(quantity))
                    .filter(CompositionCol::ProductId.eq(product.id))
                    .filter(CompositionCol::MaterialId.eq(row.material_id))
                    .exec(&txn)
                    .await?;
            }
            Some(_) => {}
            None => {
                ProductMaterials::delete_many()
                    .filter(CompositionCol::ProductId.eq(product.id))
                    .filter(CompositionCol::MaterialId.eq(row.material_id))
                    .exec(&txn)
                    .await?;
            }
        }
    }

    let to_add: Vec<CompositionActive> = desired
        .iter()
        .filter(|(material_id, _)| !current_ids.contains(material_id))
        .map(|(material_id, quantity)| CompositionActive {
            product_id: Set(product.id),
            material_id: Set(*material_id),
            quantity: Set(*quantity),
        })
        .collect();
    if !to_add.is_empty() {
        ProductMaterials::insert_many(to_add).exec(&txn).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "composition_set",
        Some("product_materials"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    get_composition(state, product.id).await
}

async fn find_owned(
    state: &AppState,
    user: &AuthUser,
    wanted_type: &str,
    id: Uuid,
) -> AppResult<crate::entity::items::Model> {
    let owning_role = if wanted_type == item_type::PRODUCT {
        ensure_vendor(user)
    } else {
        ensure_supplier(user)
    };
    owning_role?;

    let item = Items::find_by_id(id).one(&state.orm).await?;
    let item = match item {
        Some(i) if i.item_type == wanted_type => i,
        _ => return Err(AppError::NotFound),
    };
    if user.role != role::ADMIN && item.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(item)
}

async fn fetch_tags(state: &AppState, item_id: Uuid) -> AppResult<Vec<Tag>> {
    let tag_ids: Vec<Uuid> = ItemTags::find()
        .filter(ItemTagCol::ItemId.eq(item_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|link| link.tag_id)
        .collect();

    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    let tags = Tags::find()
        .filter(TagCol::Id.is_in(tag_ids))
        .order_by_asc(TagCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Tag::from)
        .collect();
    Ok(tags)
}
