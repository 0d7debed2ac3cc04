use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use marketplace_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let vendor_id = ensure_user(&pool, "vendor@example.com", "vendor123", "vendor").await?;
    let supplier_id = ensure_user(&pool, "supplier@example.com", "supplier123", "supplier").await?;
    let customer_id = ensure_user(&pool, "customer@example.com", "customer123", "customer").await?;

    seed_catalog(&pool, vendor_id, supplier_id).await?;

    println!(
        "Seed completed. Admin: {admin_id}, Vendor: {vendor_id}, Supplier: {supplier_id}, Customer: {customer_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(email.split('@').next().unwrap_or(email))
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(
    pool: &sqlx::PgPool,
    vendor_id: Uuid,
    supplier_id: Uuid,
) -> anyhow::Result<()> {
    let materials = vec![
        ("Oak board", "Kiln-dried oak, 20mm", 45000, "m2"),
        ("Steel tube", "Powder-coated, 25mm", 12000, "m"),
        ("Linen fabric", "Natural weave", 30000, "m2"),
    ];

    for (name, desc, price, unit) in materials {
        sqlx::query(
            r#"
            INSERT INTO items (id, item_type, owner_id, name, description, price, unit)
            VALUES ($1, 'material', $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(supplier_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(unit)
        .execute(pool)
        .await?;
    }

    let products = vec![
        ("Workbench", "Solid oak workbench", 550000),
        ("Side table", "Steel and linen side table", 180000),
        ("Shelf unit", "Wall-mounted oak shelf", 120000),
    ];

    for (name, desc, price) in products {
        sqlx::query(
            r#"
            INSERT INTO items (id, item_type, owner_id, name, description, price)
            VALUES ($1, 'product', $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vendor_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
