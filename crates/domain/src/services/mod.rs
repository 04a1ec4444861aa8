//! Pure domain services.

pub mod permissions;
pub mod team_policy;

pub use permissions::{Action, PermissionSet};
