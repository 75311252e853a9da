use thiserror::Error;

/// Outcomes of the auth core. The first five are expected rejections with
/// stable, non-leaking messages; `Internal` is the distinct kind for
/// unexpected faults (storage unavailable, signing failure) whose detail is
/// logged server-side but never shown to a caller.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Duplicate identity on create.
    #[error("username already taken")]
    Conflict,

    /// Bad login. Deliberately identical whether the username was unknown
    /// or the password wrong, so callers cannot enumerate usernames.
    #[error("invalid username/password")]
    InvalidCredentials,

    /// Missing, unparseable, or mis-signed session token.
    #[error("invalid token")]
    InvalidToken,

    /// Authenticated but not authorized for this resource.
    #[error("insufficient permissions")]
    Forbidden,

    /// The target resource does not exist.
    #[error("not found")]
    NotFound,

    #[error("internal error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err)
    }
}
