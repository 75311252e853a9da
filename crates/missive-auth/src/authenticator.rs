use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use missive_db::{Database, models::UserRow, queries::is_constraint_violation};
use missive_types::models::Credential;

use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::token::TokenService;

/// Input to registration. The plaintext password lives only as long as this
/// struct; what gets persisted is the hash.
#[derive(Debug)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Orchestrates registration and login over the credential store, the
/// password hasher, and the token service. Holds no mutable state.
pub struct Authenticator {
    db: Arc<Database>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    pub fn new(db: Arc<Database>, hasher: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self { db, hasher, tokens }
    }

    /// Create a credential. `Conflict` when the username is taken; the
    /// unique constraint backstops the check so a concurrent register of
    /// the same name cannot slip through as a storage fault.
    pub fn register(&self, new: NewCredential) -> Result<Credential, AuthError> {
        if self.db.get_user_by_username(&new.username)?.is_some() {
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hasher.hash(&new.password)?;
        let now = Utc::now();
        let row = UserRow {
            username: new.username,
            password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            joined_at: now,
            last_login_at: now,
        };

        match self.db.create_user(&row) {
            Ok(()) => {}
            Err(e) if is_constraint_violation(&e) => return Err(AuthError::Conflict),
            Err(e) => return Err(e.into()),
        }

        info!(username = %row.username, "registered new user");
        Ok(credential_from_row(row))
    }

    /// Verify a username/password pair, touch `last_login_at`, and issue a
    /// session token. Unknown username and wrong password are
    /// indistinguishable to the caller.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let Some(user) = self.db.get_user_by_username(username)? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        self.db.touch_last_login(username, Utc::now())?;
        info!(username, "login succeeded");
        self.tokens.issue(username)
    }

    /// Maintenance path: bump `last_login_at` for a user already known to
    /// exist. `NotFound` when the update touches zero rows (the row was
    /// deleted concurrently).
    pub fn touch_last_login(&self, username: &str) -> Result<(), AuthError> {
        let affected = self.db.touch_last_login(username, Utc::now())?;
        if affected == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }
}

pub fn credential_from_row(row: UserRow) -> Credential {
    Credential {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
        joined_at: row.joined_at,
        last_login_at: row.last_login_at,
    }
}
