//! HTTP route handlers.

pub mod access_requests;
pub mod brand_kits;
pub mod businesses;
pub mod health;
pub mod invitations;
pub mod members;
pub mod users;
