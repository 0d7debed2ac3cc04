mod common;

use marketplace_api::{
    dto::{
        cart::{AddToCartRequest, AdjustQuantityRequest},
        payments::WebhookRequest,
    },
    entity::payments::Entity as Payments,
    error::AppError,
    middleware::auth::AuthUser,
    services::{cart_service, order_service, payment_service},
};
use sea_orm::EntityTrait;

// Integration flow: customer fills the cart (draft order), checks out, pays
// through the gateway webhook.
#[tokio::test]
async fn cart_checkout_and_webhook_payment_flow() -> anyhow::Result<()> {
    let state = match common::setup_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@example.com").await?;
    let customer_id = common::create_user(&state, "customer", "customer@example.com").await?;
    let product_id =
        common::create_item(&state, vendor_id, "product", "Test Widget", 1000, 0).await?;

    let customer = AuthUser {
        user_id: customer_id,
        role: "customer".into(),
    };

    // Two adds of the same product accumulate on one line.
    cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            item_id: product_id,
        },
    )
    .await?;
    let line = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            item_id: product_id,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(line.quantity, 2);

    let cart = cart_service::get_cart(&state, &customer).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, 2000);

    // Deltas that would zero the line are rejected, the line survives.
    let rejected = cart_service::adjust_quantity(
        &state,
        &customer,
        line.id,
        AdjustQuantityRequest { delta: -2 },
    )
    .await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));

    let line = cart_service::adjust_quantity(
        &state,
        &customer,
        line.id,
        AdjustQuantityRequest { delta: 1 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(line.quantity, 3);

    let checkout = order_service::checkout(&state, &customer).await?.data.unwrap();
    assert_eq!(checkout.order.status, "pending");
    assert_eq!(checkout.order.total_amount, 3000);
    assert!(checkout.order.invoice_number.is_some());

    // The draft was consumed; the cart is empty again.
    let cart = cart_service::get_cart(&state, &customer).await?.data.unwrap();
    assert!(cart.order_id.is_none());
    assert!(cart.items.is_empty());

    // Checking out an empty cart fails.
    let empty = order_service::checkout(&state, &customer).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    // Open a checkout session and settle it through the webhook.
    let pay = payment_service::pay_order(&state, &customer, checkout.order.id)
        .await?
        .data
        .unwrap();
    let payment = Payments::find_by_id(pay.payment_id)
        .one(&state.orm)
        .await?
        .expect("payment row");

    payment_service::handle_webhook(
        &state,
        WebhookRequest {
            reference: payment.provider_reference.clone(),
            status: "succeeded".into(),
        },
    )
    .await?;

    let order = order_service::get_order(&state, &customer, checkout.order.id)
        .await?
        .data
        .unwrap()
        .order;
    assert_eq!(order.status, "paid");
    assert!(order.paid_at.is_some());

    // Webhook replays are acknowledged without changing anything.
    let replay = payment_service::handle_webhook(
        &state,
        WebhookRequest {
            reference: payment.provider_reference,
            status: "succeeded".into(),
        },
    )
    .await?;
    assert_eq!(replay.message, "Already processed");

    // Materials never reach a cart.
    let supplier_id = common::create_user(&state, "supplier", "supplier@example.com").await?;
    let material_id =
        common::create_item(&state, supplier_id, "material", "Oak board", 45000, 10).await?;
    let result = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            item_id: material_id,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}
