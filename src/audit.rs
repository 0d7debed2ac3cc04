use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// User-activity trail. Callers treat failures as non-fatal and log a
/// warning instead of failing the request.
pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// HTTP access trail, one row per request, written by the access-log layer.
pub async fn log_access(
    pool: &DbPool,
    user_id: Option<Uuid>,
    method: &str,
    path: &str,
    status: i32,
    latency_ms: i64,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO access_logs (id, user_id, method, path, status, latency_ms)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(method)
    .bind(path)
    .bind(status)
    .bind(latency_ms)
    .execute(pool)
    .await?;

    Ok(())
}
