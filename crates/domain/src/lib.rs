//! Domain layer for the Brand Kit backend.
//!
//! This crate contains:
//! - Domain models (Business, BusinessMember, BusinessInvitation, ...)
//! - Pure authorization and team-policy logic
//! - Domain error types

pub mod models;
pub mod services;
