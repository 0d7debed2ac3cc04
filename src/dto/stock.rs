use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Item, StockMovement};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovementRequest {
    /// "in" adds to stock, "out" subtracts.
    pub movement_type: String,
    pub quantity: i32,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementCreated {
    pub movement: StockMovement,
    pub material: Item,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MovementList {
    #[schema(value_type = Vec<StockMovement>)]
    pub items: Vec<StockMovement>,
}
