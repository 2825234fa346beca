use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::JwtError;
use crate::jwt::TokenValidator;
use crate::jwt::UserClaims;

/// Message returned to clients for every rejection.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// User data the gate and login flow need from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub password_hash: String,
}

/// User store failure (connection lost, query failed, ...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("User lookup failed: {0}")]
pub struct LookupError(pub String);

/// Port for resolving the identifier carried by a token.
#[async_trait]
pub trait UserLookup: Send + Sync + 'static {
    /// Find a user by identifier.
    ///
    /// # Returns
    /// The user, or `None` if no user has this identifier
    ///
    /// # Errors
    /// * `LookupError` - The store could not be queried
    async fn lookup_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, LookupError>;
}

/// Verified principal attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthenticatedIdentity {
    pub user_id: String,
}

/// Per-request context passed down to handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub identity: Option<AuthenticatedIdentity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: AuthenticatedIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        self.identity.as_ref()
    }
}

/// Reason a request was rejected.
///
/// Kept for diagnostics only; callers see [`UNAUTHORIZED_MESSAGE`] whatever
/// the variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Missing bearer credential")]
    MissingCredential,

    #[error("Token rejected: {0}")]
    Token(#[from] JwtError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("No user matches the token subject")]
    UnknownUser,
}

impl GateError {
    /// Stage of the gate that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            GateError::MissingCredential => "extract_credential",
            GateError::Token(_) => "validate",
            GateError::Lookup(_) | GateError::UnknownUser => "resolve_identity",
        }
    }
}

/// Read the token from an `Authorization` header value.
///
/// Accepts `Bearer <token>` (scheme in any case) and a bare token.
pub fn extract_bearer(authorization: Option<&str>) -> Option<&str> {
    let value = authorization?.trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authentication gate: credential → verified token → known user.
///
/// Every call ends in exactly one outcome, an identity or a [`GateError`].
pub struct AuthGate<L: UserLookup> {
    validator: TokenValidator,
    users: Arc<L>,
}

impl<L: UserLookup> Clone for AuthGate<L> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            users: Arc::clone(&self.users),
        }
    }
}

impl<L: UserLookup> AuthGate<L> {
    pub fn new(validator: TokenValidator, users: Arc<L>) -> Self {
        Self { validator, users }
    }

    /// Authorize a request from its `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingCredential` - Header absent or empty
    /// * `Token` - Token failed validation
    /// * `Lookup` - User store failed
    /// * `UnknownUser` - Token subject does not exist
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedIdentity, GateError> {
        self.authorize_at(authorization, Utc::now()).await
    }

    /// Same as [`AuthGate::authorize`] with an explicit clock.
    pub async fn authorize_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, GateError> {
        let result = self.resolve(authorization, now).await;

        match &result {
            Ok(identity) => {
                tracing::debug!(user_id = %identity.user_id, "Request authorized");
            }
            Err(e) => {
                tracing::warn!(stage = e.stage(), error = %e, "Request rejected");
            }
        }

        result
    }

    async fn resolve(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, GateError> {
        let token = extract_bearer(authorization).ok_or(GateError::MissingCredential)?;

        let verified = self.validator.validate_at::<UserClaims>(token, now)?;

        let user = self
            .users
            .lookup_user_by_id(&verified.claims.user_id)
            .await?
            .ok_or(GateError::UnknownUser)?;

        Ok(AuthenticatedIdentity { user_id: user.id })
    }
}
