pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod category_service;
pub mod dashboard_service;
pub mod favorite_service;
pub mod invitation_service;
pub mod item_service;
pub mod order_service;
pub mod payment_service;
pub mod stock_service;
pub mod tag_service;
