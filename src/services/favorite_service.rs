use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::favorites::{AddFavoriteRequest, FavoriteMaterialList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_vendor},
    models::{Item, MaterialFavorite, item_type},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Materials the vendor has bookmarked, joined to current item data.
pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteMaterialList>> {
    ensure_vendor(user)?;

    let (page, limit, offset) = pagination.normalize();
    let materials = sqlx::query_as::<_, Item>(
        r#"
        SELECT i.*
        FROM material_favorites f
        JOIN items i ON i.id = f.material_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM material_favorites WHERE user_id = $1")
            .bind(user.user_id)
            .fetch_one(&state.pool)
            .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = FavoriteMaterialList { items: materials };
    Ok(ApiResponse::success("OK", data, Some(meta)))
}

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<MaterialFavorite>> {
    ensure_vendor(user)?;

    let material: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM items WHERE id = $1 AND item_type = $2")
            .bind(payload.material_id)
            .bind(item_type::MATERIAL)
            .fetch_optional(&state.pool)
            .await?;
    if material.is_none() {
        return Err(AppError::BadRequest("Material not found".into()));
    }

    let existing: Option<MaterialFavorite> = sqlx::query_as(
        "SELECT * FROM material_favorites WHERE user_id = $1 AND material_id = $2",
    )
    .bind(user.user_id)
    .bind(payload.material_id)
    .fetch_optional(&state.pool)
    .await?;

    let favorite = if let Some(fav) = existing {
        fav
    } else {
        sqlx::query_as::<_, MaterialFavorite>(
            r#"
            INSERT INTO material_favorites (user_id, material_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user.user_id)
        .bind(payload.material_id)
        .fetch_one(&state.pool)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "favorite_add",
        Some("material_favorites"),
        Some(serde_json::json!({ "material_id": payload.material_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Added to favorites",
        favorite,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    material_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_vendor(user)?;

    let result =
        sqlx::query("DELETE FROM material_favorites WHERE user_id = $1 AND material_id = $2")
            .bind(user.user_id)
            .bind(material_id)
            .execute(&state.pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "favorite_remove",
        Some("material_favorites"),
        Some(serde_json::json!({ "material_id": material_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
