use super::claims::ClaimSet;
use super::errors::ClaimError;

/// Typed view over a verified [`ClaimSet`].
///
/// Implemented once per claim shape. The validator is generic over this trait,
/// so the caller picks the shape at compile time:
///
/// ```
/// use blog_auth::jwt::{ClaimSet, FromClaimSet, UserClaims};
///
/// let claims = ClaimSet::new()
///     .with_claim("userId", "42")
///     .with_claim("exp", 1_700_000_000i64);
/// let user = UserClaims::from_claim_set(&claims).unwrap();
/// assert_eq!(user.user_id, "42");
/// ```
pub trait FromClaimSet: Sized {
    /// Build the typed claims.
    ///
    /// # Errors
    /// * `Missing` - A required claim is absent
    /// * `WrongType` - A claim has the wrong semantic type
    fn from_claim_set(claims: &ClaimSet) -> Result<Self, ClaimError>;
}

impl FromClaimSet for ClaimSet {
    fn from_claim_set(claims: &ClaimSet) -> Result<Self, ClaimError> {
        Ok(claims.clone())
    }
}
