use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public slice of a user record, safe to embed in any response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Full externally-visible view of a user record. The password hash is not
/// part of this type and so can never reach a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

