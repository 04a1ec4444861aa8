//! Shared utilities and common types for the Brand Kit backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access-token validation
//! - Opaque token generation behind an injectable randomness provider
//! - Common validation logic
//! - Pagination helpers

pub mod jwt;
pub mod pagination;
pub mod token;
pub mod validation;
