//! Stateless per-request authorization decisions.
//!
//! Pure predicates over `(caller, resource)` — no storage access, no side
//! effects. Existence checks happen before these run: a missing resource is
//! `NotFound`, never `Forbidden`.

use crate::error::AuthError;

/// The identity a request acts as: the subject of a verified claim, or
/// anonymous when no valid token was presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(String),
}

/// Correct-user rule: the caller must be the resource owner. Anonymous
/// callers are always denied.
pub fn allows_user(caller: &Caller, owner: &str) -> bool {
    matches!(caller, Caller::User(u) if u == owner)
}

/// Message visibility: either participant may see the message.
pub fn allows_view(caller: &Caller, from_username: &str, to_username: &str) -> bool {
    allows_user(caller, from_username) || allows_user(caller, to_username)
}

/// Read-receipt mutation: narrower than visibility — only the recipient.
/// Unaffected by whether the message is already read.
pub fn allows_mark_read(caller: &Caller, to_username: &str) -> bool {
    allows_user(caller, to_username)
}

pub fn ensure_correct_user(caller: &Caller, owner: &str) -> Result<(), AuthError> {
    if allows_user(caller, owner) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

pub fn ensure_can_view(
    caller: &Caller,
    from_username: &str,
    to_username: &str,
) -> Result<(), AuthError> {
    if allows_view(caller, from_username, to_username) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

pub fn ensure_can_mark_read(caller: &Caller, to_username: &str) -> Result<(), AuthError> {
    if allows_mark_read(caller, to_username) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
