pub mod access_logs;
pub mod audit_logs;
pub mod categories;
pub mod invitations;
pub mod item_tags;
pub mod items;
pub mod material_favorites;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod product_materials;
pub mod stock_movements;
pub mod tags;
pub mod users;

pub use access_logs::Entity as AccessLogs;
pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use invitations::Entity as Invitations;
pub use item_tags::Entity as ItemTags;
pub use items::Entity as Items;
pub use material_favorites::Entity as MaterialFavorites;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use product_materials::Entity as ProductMaterials;
pub use stock_movements::Entity as StockMovements;
pub use tags::Entity as Tags;
pub use users::Entity as Users;
