use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use missive_types::api::Claims;

use crate::error::AuthError;

/// Issues and verifies compact signed session tokens (HS256 JWTs). The
/// signing secret is captured at construction and immutable thereafter, so
/// concurrent use needs no synchronization.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Claims carry no `exp`: a token stays valid for the life of the
        // secret. Inherited limitation, see DESIGN.md.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a URL-safe token for `username`.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            iat: Utc::now().timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(anyhow!("token signing failed: {e}")))
    }

    /// Check signature integrity and decode the claims. Any structural or
    /// signature problem collapses into `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
