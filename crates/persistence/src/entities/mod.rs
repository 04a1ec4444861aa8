//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod access_request;
pub mod brand_kit;
pub mod business;
pub mod invitation;
pub mod member;
pub mod user;

pub use access_request::{
    AccessRequestStatusDb, BusinessAccessRequestEntity, BusinessAccessRequestWithUserEntity,
};
pub use brand_kit::{BrandKitEntity, SharedBrandKitEntity};
pub use business::{BusinessEntity, BusinessWithRoleEntity};
pub use invitation::{
    BusinessInvitationEntity, BusinessInvitationWithDetailsEntity, InvitationStatusDb,
};
pub use member::{BusinessMemberEntity, BusinessMemberWithUserEntity, BusinessRoleDb};
pub use user::UserEntity;
