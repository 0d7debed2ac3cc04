use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{PayOrderResponse, WebhookRequest},
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{order_status, payment_status},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Open a hosted checkout session for a pending order. Replaying the call
/// while a session is still open returns the existing one.
pub async fn pay_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<PayOrderResponse>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(order_id))
                .add(OrderCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if order.status != order_status::PENDING {
        return Err(AppError::BadRequest(format!(
            "order is {}, only pending orders can be paid",
            order.status
        )));
    }

    let open = Payments::find()
        .filter(
            Condition::all()
                .add(PaymentCol::OrderId.eq(order.id))
                .add(PaymentCol::Status.eq(payment_status::CREATED)),
        )
        .one(&state.orm)
        .await?;
    if let Some(payment) = open {
        let resp = PayOrderResponse {
            payment_id: payment.id,
            checkout_url: payment.checkout_url,
        };
        return Ok(ApiResponse::success("Checkout open", resp, None));
    }

    let return_url = format!("{}/api/payments/return", state.config.base_url);
    let session = state
        .gateway
        .create_checkout(order.id, order.total_amount, &return_url)
        .await?;

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        provider_reference: Set(session.reference),
        amount: Set(order.total_amount),
        status: Set(payment_status::CREATED.to_string()),
        checkout_url: Set(session.url),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_created",
        Some("payments"),
        Some(serde_json::json!({ "order_id": order.id, "payment_id": payment.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = PayOrderResponse {
        payment_id: payment.id,
        checkout_url: payment.checkout_url,
    };
    Ok(ApiResponse::success("Checkout created", resp, None))
}

/// Gateway callback. Settles the payment and order in one transaction;
/// replays are acknowledged without touching anything.
pub async fn handle_webhook(
    state: &AppState,
    payload: WebhookRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let payment = Payments::find()
        .filter(PaymentCol::ProviderReference.eq(payload.reference.clone()))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let payment = match payment {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if payment.status != payment_status::CREATED {
        // Already settled one way or the other.
        return Ok(ApiResponse::success(
            "Already processed",
            serde_json::json!({}),
            Some(Meta::empty()),
        ));
    }

    let order_id = payment.order_id;
    let succeeded = payload.status == "succeeded";

    let mut active: PaymentActive = payment.into();
    active.status = Set(if succeeded {
        payment_status::CAPTURED.to_string()
    } else {
        payment_status::FAILED.to_string()
    });
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    if succeeded {
        let order = Orders::find_by_id(order_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let order = match order {
            Some(o) => o,
            None => return Err(AppError::NotFound),
        };
        if order.status != order_status::PAID {
            let mut active: OrderActive = order.into();
            active.status = Set(order_status::PAID.to_string());
            active.paid_at = Set(Some(Utc::now().into()));
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
        }
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "payment_webhook",
        Some("payments"),
        Some(serde_json::json!({ "reference": payload.reference, "status": payload.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Webhook processed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
