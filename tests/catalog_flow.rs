mod common;

use marketplace_api::{
    dto::{
        categories::CreateCategoryRequest,
        items::{
            CompositionEntry, CreateMaterialRequest, CreateProductRequest, SetCompositionRequest,
            SetItemTagsRequest, UpdateItemRequest,
        },
        tags::CreateTagRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{ItemQuery, LowStockQuery, Pagination},
    services::{admin_service, category_service, item_service, tag_service},
};

// Integration flow: catalog CRUD with ownership rules, tag-set diffing and
// the product bill of materials.
#[tokio::test]
async fn catalog_tags_and_composition_flow() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let admin_id = common::create_user(&state, "admin", "admin@example.com").await?;
    let vendor_id = common::create_user(&state, "vendor", "vendor@example.com").await?;
    let supplier_id = common::create_user(&state, "supplier", "supplier@example.com").await?;

    let admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };
    let vendor = AuthUser {
        user_id: vendor_id,
        role: "vendor".into(),
    };
    let supplier = AuthUser {
        user_id: supplier_id,
        role: "supplier".into(),
    };

    // Category management is admin-only.
    let denied = category_service::create_category(
        &state,
        &vendor,
        CreateCategoryRequest {
            name: "Furniture".into(),
            description: None,
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let category = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Furniture".into(),
            description: Some("Things to sit on".into()),
        },
    )
    .await?
    .data
    .unwrap();

    let wood = tag_service::create_tag(
        &state,
        &admin,
        CreateTagRequest { name: "wood".into() },
    )
    .await?
    .data
    .unwrap();
    let handmade = tag_service::create_tag(
        &state,
        &admin,
        CreateTagRequest {
            name: "handmade".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let product = item_service::create_product(
        &state,
        &vendor,
        CreateProductRequest {
            name: "Workbench".into(),
            description: Some("Solid oak workbench".into()),
            price: 550000,
            category_id: Some(category.id),
        },
    )
    .await?
    .data
    .unwrap();

    let material = item_service::create_material(
        &state,
        &supplier,
        CreateMaterialRequest {
            name: "Oak board".into(),
            description: None,
            price: 45000,
            unit: Some("m2".into()),
            category_id: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(material.stock, 0);

    // A vendor cannot edit someone else's material.
    let denied = item_service::update_item(
        &state,
        &vendor,
        "material",
        material.id,
        UpdateItemRequest {
            name: Some("Stolen board".into()),
            description: None,
            price: None,
            unit: None,
            category_id: None,
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // Tag set replacement is a diff: start with both, shrink to one.
    item_service::set_item_tags(
        &state,
        &vendor,
        product.id,
        SetItemTagsRequest {
            tag_ids: vec![wood.id, handmade.id],
        },
    )
    .await?;
    let tagged = item_service::set_item_tags(
        &state,
        &vendor,
        product.id,
        SetItemTagsRequest {
            tag_ids: vec![wood.id],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(tagged.tags.len(), 1);
    assert_eq!(tagged.tags[0].id, wood.id);

    let unknown = item_service::set_item_tags(
        &state,
        &vendor,
        product.id,
        SetItemTagsRequest {
            tag_ids: vec![uuid::Uuid::new_v4()],
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    // Tag filter narrows product listings.
    let listed = item_service::list_items(
        &state,
        "product",
        ItemQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            q: None,
            min_price: None,
            max_price: None,
            category_id: None,
            tag_id: Some(wood.id),
            sort_by: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].id, product.id);

    // Bill of materials: set, update quantity, and the zero-quantity guard.
    item_service::set_composition(
        &state,
        &vendor,
        product.id,
        SetCompositionRequest {
            materials: vec![CompositionEntry {
                material_id: material.id,
                quantity: 2,
            }],
        },
    )
    .await?;
    let composition = item_service::set_composition(
        &state,
        &vendor,
        product.id,
        SetCompositionRequest {
            materials: vec![CompositionEntry {
                material_id: material.id,
                quantity: 5,
            }],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(composition.items.len(), 1);
    assert_eq!(composition.items[0].quantity, 5);

    let zero = item_service::set_composition(
        &state,
        &vendor,
        product.id,
        SetCompositionRequest {
            materials: vec![CompositionEntry {
                material_id: material.id,
                quantity: 0,
            }],
        },
    )
    .await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    // A material in a bill of materials cannot be deleted.
    let blocked = item_service::delete_item(&state, &supplier, "material", material.id).await;
    assert!(matches!(blocked, Err(AppError::BadRequest(_))));

    // Clearing the composition frees it up.
    item_service::set_composition(
        &state,
        &vendor,
        product.id,
        SetCompositionRequest {
            materials: Vec::new(),
        },
    )
    .await?;
    item_service::delete_item(&state, &supplier, "material", material.id).await?;

    // Low stock report lists materials at or under the threshold.
    let low_id =
        common::create_item(&state, supplier_id, "material", "Steel tube", 12000, 3).await?;
    let low = admin_service::list_low_stock(
        &state,
        &admin,
        LowStockQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            threshold: Some(5),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(low.items.iter().any(|item| item.id == low_id));

    Ok(())
}
