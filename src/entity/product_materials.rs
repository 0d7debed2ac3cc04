use sea_orm::entity::prelude::*;

/// Bill of materials: the material rows a vendor composes a product from.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub material_id: Uuid,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ProductId",
        to = "super::items::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::MaterialId",
        to = "super::items::Column::Id"
    )]
    Material,
}

impl ActiveModelBehavior for ActiveModel {}
