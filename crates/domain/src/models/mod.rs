//! Domain models for the Brand Kit backend.

pub mod access_request;
pub mod brand_kit;
pub mod business;
pub mod invitation;
pub mod member;
pub mod user;

pub use access_request::{AccessRequestStatus, BusinessAccessRequest};
pub use brand_kit::BrandKit;
pub use business::Business;
pub use invitation::{BusinessInvitation, InvitationStatus};
pub use member::{BusinessMember, BusinessRole, EffectiveRole};
pub use user::User;
