use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::ClaimSet;
use crate::jwt::FromClaimSet;
use crate::jwt::JwtError;
use crate::jwt::JwtSecret;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenValidator;
use crate::jwt::VerifiedToken;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

const PLACEHOLDER_PASSWORD: &str = "placeholder-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and token issuance.
///
/// Built once at startup from the signing secret and token lifetime, then
/// shared by the login flow and the gate.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    issuer: TokenIssuer,
    validator: TokenValidator,
    token_ttl: Duration,
    placeholder_hash: OnceLock<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
    /// Expiration recorded in the token, whole seconds
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Key used to sign and verify tokens
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Authenticator using the default Argon2id cost
    pub fn new(secret: &JwtSecret, token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            issuer: TokenIssuer::new(secret),
            validator: TokenValidator::new(secret),
            token_ttl,
            placeholder_hash: OnceLock::new(),
        }
    }

    /// Replace the password hasher (e.g. one built with a configured cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self.placeholder_hash = OnceLock::new();
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to encode in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token and its expiration
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Jwt` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &ClaimSet,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let now = Utc::now();
        let access_token = self.issuer.issue_at(claims, self.token_ttl, now)?;
        let expires_at = DateTime::from_timestamp((now + self.token_ttl).timestamp(), 0)
            .ok_or_else(|| JwtError::SigningFailed("expiration out of range".to_string()))?;

        Ok(AuthenticationResult {
            access_token,
            expires_at,
        })
    }

    /// Reject a login for which no account exists.
    ///
    /// Verifies `password` against a placeholder hash built with the
    /// configured cost, so the rejection costs as much as a wrong password.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, self.placeholder_hash());
        AuthenticationError::InvalidCredentials
    }

    fn placeholder_hash(&self) -> &str {
        self.placeholder_hash.get_or_init(|| {
            self.password_hasher
                .hash(PLACEHOLDER_PASSWORD)
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to build placeholder password hash");
                    String::new()
                })
        })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, claims: &ClaimSet) -> Result<String, JwtError> {
        self.issuer.issue(claims, self.token_ttl)
    }

    /// Validate a token and decode its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token<T: FromClaimSet>(
        &self,
        token: &str,
    ) -> Result<VerifiedToken<T>, JwtError> {
        self.validator.validate(token)
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}
