use std::sync::Arc;

use marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{items::ActiveModel as ItemActive, users::ActiveModel as UserActive},
    mailer::NoopMailer,
    payment::OfflineGateway,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Build an AppState against the configured test database, or None when no
/// database is configured in the environment (the flow tests skip then).
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, payments, stock_movements, material_favorites, \
         item_tags, product_materials, invitations, access_logs, audit_logs, items, categories, \
         tags, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 0,
        base_url: "http://127.0.0.1:0".to_string(),
        invitation_ttl_hours: 72,
        smtp: None,
        gateway: None,
    };

    let gateway = OfflineGateway {
        base_url: config.base_url.clone(),
    };

    Ok(Some(AppState {
        pool,
        orm,
        config,
        mailer: Arc::new(NoopMailer),
        gateway: Arc::new(gateway),
    }))
}

pub async fn create_item(
    state: &AppState,
    owner_id: Uuid,
    item_type: &str,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        item_type: Set(item_type.to_string()),
        owner_id: Set(owner_id),
        category_id: Set(None),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        stock: Set(stock),
        unit: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(item.id)
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        name: Set(email.split('@').next().unwrap_or("user").to_string()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
