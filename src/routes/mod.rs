use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod dashboard;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod invitations;
pub mod items;
pub mod materials;
pub mod orders;
pub mod params;
pub mod payments;
pub mod products;
pub mod tags;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/materials", materials::router())
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .nest("/items", items::router())
        .nest("/favorites", favorites::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router().merge(payments::order_payment_router()))
        .nest("/payments", payments::router())
        .nest("/invitations", invitations::router())
        .nest("/admin", admin::router())
        .nest("/dashboard", dashboard::router())
}
