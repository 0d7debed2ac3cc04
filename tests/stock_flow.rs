mod common;

use marketplace_api::{
    dto::{favorites::AddFavoriteRequest, stock::CreateMovementRequest},
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::Pagination,
    services::{dashboard_service, favorite_service, stock_service},
};

// Integration flow: supplier moves stock through the ledger, vendor bookmarks
// the material, supplier dashboard reflects both.
#[tokio::test]
async fn stock_ledger_and_favorites_flow() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let supplier_id = common::create_user(&state, "supplier", "supplier@example.com").await?;
    let vendor_id = common::create_user(&state, "vendor", "vendor@example.com").await?;
    let other_supplier_id =
        common::create_user(&state, "supplier", "other-supplier@example.com").await?;
    let material_id =
        common::create_item(&state, supplier_id, "material", "Steel tube", 12000, 0).await?;

    let supplier = AuthUser {
        user_id: supplier_id,
        role: "supplier".into(),
    };
    let vendor = AuthUser {
        user_id: vendor_id,
        role: "vendor".into(),
    };
    let other_supplier = AuthUser {
        user_id: other_supplier_id,
        role: "supplier".into(),
    };

    // Inbound movement raises stock.
    let created = stock_service::create_movement(
        &state,
        &supplier,
        material_id,
        CreateMovementRequest {
            movement_type: "in".into(),
            quantity: 10,
            note: Some("initial delivery".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.material.stock, 10);

    // Outbound movement lowers it.
    let created = stock_service::create_movement(
        &state,
        &supplier,
        material_id,
        CreateMovementRequest {
            movement_type: "out".into(),
            quantity: 3,
            note: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.material.stock, 7);

    // Overdrawing is rejected and leaves no ledger row behind.
    let overdraw = stock_service::create_movement(
        &state,
        &supplier,
        material_id,
        CreateMovementRequest {
            movement_type: "out".into(),
            quantity: 100,
            note: None,
        },
    )
    .await;
    assert!(matches!(overdraw, Err(AppError::BadRequest(_))));

    // Unknown movement kinds are rejected up front.
    let sideways = stock_service::create_movement(
        &state,
        &supplier,
        material_id,
        CreateMovementRequest {
            movement_type: "sideways".into(),
            quantity: 1,
            note: None,
        },
    )
    .await;
    assert!(matches!(sideways, Err(AppError::BadRequest(_))));

    // Another supplier cannot touch this material.
    let foreign = stock_service::create_movement(
        &state,
        &other_supplier,
        material_id,
        CreateMovementRequest {
            movement_type: "in".into(),
            quantity: 1,
            note: None,
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Forbidden)));

    let movements = stock_service::list_movements(
        &state,
        &supplier,
        material_id,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?;
    let meta = movements.meta.unwrap();
    assert_eq!(meta.total, Some(2));
    let items = movements.data.unwrap().items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].movement_type, "out");

    // Vendor bookmarks the material; the add is idempotent.
    favorite_service::add_favorite(
        &state,
        &vendor,
        AddFavoriteRequest { material_id },
    )
    .await?;
    favorite_service::add_favorite(
        &state,
        &vendor,
        AddFavoriteRequest { material_id },
    )
    .await?;

    let favorites = favorite_service::list_favorites(
        &state,
        &vendor,
        Pagination {
            page: Some(1),
            per_page: Some(20),
        },
    )
    .await?;
    let items = favorites.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, material_id);

    let dashboard = dashboard_service::supplier_dashboard(&state, &supplier)
        .await?
        .data
        .unwrap();
    assert_eq!(dashboard.material_count, 1);
    assert_eq!(dashboard.movements.inbound, 10);
    assert_eq!(dashboard.movements.outbound, 3);
    assert_eq!(dashboard.favorites_received, 1);

    // Unfavorite once works, twice is a 404.
    favorite_service::remove_favorite(&state, &vendor, material_id).await?;
    let gone = favorite_service::remove_favorite(&state, &vendor, material_id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    Ok(())
}
