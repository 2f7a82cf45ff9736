//! Local accounts: password hashing and request identity

pub mod identity;
pub mod password;

pub use identity::{actor_from_request, login_redirect, require_user, session_token};
