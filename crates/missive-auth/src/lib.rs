//! Authentication and authorization core: password hashing, session-token
//! issuance/verification, registration/login orchestration, and the
//! per-resource access rules for users and messages.

pub mod authenticator;
pub mod error;
pub mod guard;
pub mod password;
pub mod token;

pub use authenticator::{Authenticator, NewCredential};
pub use error::AuthError;
pub use guard::Caller;
pub use password::PasswordHasher;
pub use token::TokenService;

/// Process-wide auth configuration, read once at startup and passed down by
/// value. Nothing in this crate reads ambient state after construction.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for session-token signing.
    pub token_secret: String,
    /// Argon2 time cost for password hashing.
    pub work_factor: u32,
}

impl AuthConfig {
    pub const DEFAULT_WORK_FACTOR: u32 = 2;
}
