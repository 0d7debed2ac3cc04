pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod dashboard;
pub mod favorites;
pub mod invitations;
pub mod items;
pub mod orders;
pub mod payments;
pub mod stock;
pub mod tags;
