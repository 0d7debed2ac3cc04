use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Item;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustQuantityRequest {
    /// Signed change; the resulting quantity must stay positive.
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub item: Item,
    pub quantity: i32,
    pub price: i64,
}

/// The caller's draft order rendered as a cart. `order_id` is None until the
/// first AddToCart creates the draft.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartDto {
    pub order_id: Option<Uuid>,
    pub items: Vec<CartLine>,
    pub total: i64,
}
