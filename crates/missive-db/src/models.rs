//! Database row types — these map directly to SQLite rows.
//! Distinct from missive-types API models to keep the DB layer independent.

use chrono::{DateTime, Utc};

pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// User columns safe to join into message listings. The password hash is
/// not part of this projection.
pub struct ProfileRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

pub struct MessageRow {
    pub id: i64,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message with both participant profiles joined in.
pub struct MessageDetailRow {
    pub message: MessageRow,
    pub from_user: ProfileRow,
    pub to_user: ProfileRow,
}

/// One side of a user's sent/received listing: the message plus the
/// counterpart's profile.
pub struct MessageSideRow {
    pub id: i64,
    pub counterpart: ProfileRow,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
