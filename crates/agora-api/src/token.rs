use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use agora_types::api::Claims;

use crate::error::ApiError;

pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Signing material for access tokens. Built once at startup and shared
/// read-only through the application state; never rotated at runtime.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // An expired token is expired, no grace period.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `user_id` that expires `ttl` from now.
    pub fn issue(&self, user_id: i64) -> anyhow::Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> anyhow::Result<String> {
        let exp = (now + self.ttl).timestamp();
        let claims = Claims {
            user_id,
            exp: usize::try_from(exp)?,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Check signature, structure and expiry; return the subject user id.
    /// No storage access happens here.
    pub fn validate(&self, token: &str) -> Result<i64, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| ApiError::AuthInvalid)?;
        Ok(data.claims.user_id)
    }
}
