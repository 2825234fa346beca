use std::fmt;

use super::errors::JwtError;

/// Recommended minimum secret length for HS256.
pub const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Symmetric signing secret shared by [`TokenIssuer`](super::TokenIssuer) and
/// [`TokenValidator`](super::TokenValidator).
///
/// Loaded once at startup. `Debug` never prints the key material.
#[derive(Clone)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    /// Wrap raw secret bytes.
    ///
    /// # Errors
    /// * `InvalidSecret` - The secret is empty
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, JwtError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(JwtError::InvalidSecret(
                "secret must not be empty".to_string(),
            ));
        }

        if secret.len() < RECOMMENDED_SECRET_BYTES {
            tracing::warn!(
                length = secret.len(),
                recommended = RECOMMENDED_SECRET_BYTES,
                "JWT secret is shorter than recommended"
            );
        }

        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}
