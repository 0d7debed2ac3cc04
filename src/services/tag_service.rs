use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::tags::{CreateTagRequest, TagList, UpdateTagRequest},
    entity::tags::{ActiveModel as TagActive, Column as TagCol, Entity as Tags},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Tag,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_tags(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<TagList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Tags::find().order_by_asc(TagCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Tag::from)
        .collect();

    Ok(ApiResponse::paginated("Tags", TagList { items }, page, limit, total))
}

pub async fn create_tag(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTagRequest,
) -> AppResult<ApiResponse<Tag>> {
    ensure_admin(user)?;

    let taken = Tags::find()
        .filter(TagCol::Name.eq(payload.name.clone()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::BadRequest("tag name is taken".into()));
    }

    let tag = TagActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "tag_create",
        Some("tags"),
        Some(serde_json::json!({ "tag_id": tag.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Tag created",
        Tag::from(tag),
        Some(Meta::empty()),
    ))
}

pub async fn update_tag(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTagRequest,
) -> AppResult<ApiResponse<Tag>> {
    ensure_admin(user)?;

    let existing = Tags::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let mut active: TagActive = existing.into();
    active.name = Set(payload.name);
    let tag = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "tag_update",
        Some("tags"),
        Some(serde_json::json!({ "tag_id": tag.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        Tag::from(tag),
        Some(Meta::empty()),
    ))
}

/// Tag links cascade, so removing a tag silently untags every item.
pub async fn delete_tag(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Tags::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "tag_delete",
        Some("tags"),
        Some(serde_json::json!({ "tag_id": id })),
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
