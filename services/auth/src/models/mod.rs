//! Session service models

pub mod role;
pub mod session;
pub mod user;

// Re-export for convenience
pub use role::Role;
pub use session::{ProfileUpdate, Session, display_name_from_email, session_id, to_base36};
pub use user::LoginCredentials;
