use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::ClaimSet;
use super::errors::JwtError;
use super::secret::JwtSecret;
use super::SIGNING_ALGORITHM;

/// Signs claim sets into HS256 tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    header: Header,
}

impl TokenIssuer {
    pub fn new(secret: &JwtSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            header: Header::new(SIGNING_ALGORITHM),
        }
    }

    /// Issue a token that expires `ttl` from now.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(&self, claims: &ClaimSet, ttl: Duration) -> Result<String, JwtError> {
        self.issue_at(claims, ttl, Utc::now())
    }

    /// Issue a token that expires `ttl` after `now`.
    ///
    /// Caller claims are copied; any `exp` they carry is overwritten. The
    /// expiration is truncated to whole seconds. A zero or negative `ttl`
    /// yields a token that is already expired.
    ///
    /// # Errors
    /// * `SigningFailed` - Expiration out of range or token encoding failed
    pub fn issue_at(
        &self,
        claims: &ClaimSet,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::SigningFailed("expiration out of range".to_string()))?;

        let mut payload = claims.clone();
        payload.set_expiration(expires_at);

        encode(&self.header, &payload, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }
}
