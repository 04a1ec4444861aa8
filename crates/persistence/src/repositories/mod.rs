//! Repository implementations for database operations.

pub mod access_request;
pub mod brand_kit;
pub mod business;
pub mod invitation;
pub mod member;
pub mod user;

pub use access_request::AccessRequestRepository;
pub use brand_kit::BrandKitRepository;
pub use business::BusinessRepository;
pub use invitation::InvitationRepository;
pub use member::MemberRepository;
pub use user::UserRepository;
