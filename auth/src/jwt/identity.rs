use super::claims::ClaimSet;
use super::claims::EXPIRATION_CLAIM;
use super::codec::FromClaimSet;
use super::errors::ClaimError;

/// Claim carrying the user identifier.
pub const USER_ID_CLAIM: &str = "userId";

/// Identity claims: who the token was issued to and until when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserClaims {
    pub user_id: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}

impl UserClaims {
    /// Claim set to hand to the issuer for `user_id`.
    ///
    /// Expiration is added by the issuer.
    pub fn claim_set(user_id: impl ToString) -> ClaimSet {
        ClaimSet::new().with_claim(USER_ID_CLAIM, user_id.to_string())
    }
}

impl FromClaimSet for UserClaims {
    fn from_claim_set(claims: &ClaimSet) -> Result<Self, ClaimError> {
        let user_id = claims.require_str(USER_ID_CLAIM)?;
        if user_id.is_empty() {
            return Err(ClaimError::WrongType {
                claim: USER_ID_CLAIM.to_string(),
                expected: "a non-empty string",
            });
        }

        let expires_at = claims.require_timestamp(EXPIRATION_CLAIM)?;

        Ok(Self {
            user_id: user_id.to_string(),
            expires_at,
        })
    }
}
