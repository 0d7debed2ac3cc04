use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct PayOrderResponse {
    pub payment_id: Uuid,
    pub checkout_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookRequest {
    pub reference: String,
    /// Provider status; "succeeded" marks the order paid, anything else
    /// fails the payment attempt.
    pub status: String,
}
