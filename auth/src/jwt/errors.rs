use thiserror::Error;

/// Error raised when a claim set does not have the shape a claims type needs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Missing required claim: {0}")]
    Missing(String),

    #[error("Claim `{claim}` has the wrong type: expected {expected}")]
    WrongType {
        claim: String,
        expected: &'static str,
    },
}

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has no expiration claim")]
    MissingExpiration,

    #[error("Token expired at {0}")]
    Expired(i64),

    #[error("Failed to decode claims: {0}")]
    Decode(#[from] ClaimError),
}
