use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Item, Tag};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMaterialRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Shared update payload; stock is absent on purpose, only the movement
/// ledger writes it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemList {
    #[schema(value_type = Vec<Item>)]
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemWithTags {
    pub item: Item,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetItemTagsRequest {
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompositionEntry {
    pub material_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCompositionRequest {
    pub materials: Vec<CompositionEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompositionLine {
    pub material: Item,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CompositionList {
    #[schema(value_type = Vec<CompositionLine>)]
    pub items: Vec<CompositionLine>,
}
