//! Authentication primitives for venuehub: argon2 password hashing and an
//! in-memory session table keyed by opaque bearer tokens.
//!
//! A session caches the role claim at issue time; profile role edits only
//! become visible on the next sign-in, which is the contract the rest of
//! the service relies on.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{Session, SessionManager};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("failed to hash password: {0}")]
    Hashing(String),
}
