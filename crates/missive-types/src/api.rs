use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Profile;

// -- Session claims --

/// Signed-token claims shared between missive-auth (issuing/verifying) and
/// missive-api (the request extension carrying the caller identity).
/// Canonical definition lives here to eliminate duplication.
///
/// There is deliberately no `exp` claim: tokens stay valid for the life of
/// the signing secret. See DESIGN.md for the risk this carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub to_username: String,
    pub body: String,
}

/// Summary returned from message creation.
#[derive(Debug, Serialize)]
pub struct MessageSummary {
    pub id: i64,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Full detail with both participants expanded.
#[derive(Debug, Serialize)]
pub struct MessageDetail {
    pub id: i64,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub from_user: Profile,
    pub to_user: Profile,
}

/// One entry in a user's sent-messages listing.
#[derive(Debug, Serialize)]
pub struct SentMessage {
    pub id: i64,
    pub to_user: Profile,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// One entry in a user's received-messages listing.
#[derive(Debug, Serialize)]
pub struct ReceivedMessage {
    pub id: i64,
    pub from_user: Profile,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ReadReceipt {
    pub id: i64,
    pub read_at: DateTime<Utc>,
}
