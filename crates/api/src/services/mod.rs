//! Application services.

pub mod team;

pub use team::TeamService;
