pub mod claims;
pub mod codec;
pub mod errors;
pub mod identity;
pub mod issuer;
pub mod secret;
pub mod validator;

use jsonwebtoken::Algorithm;

pub use claims::ClaimSet;
pub use claims::ClaimValue;
pub use claims::EXPIRATION_CLAIM;
pub use codec::FromClaimSet;
pub use errors::ClaimError;
pub use errors::JwtError;
pub use identity::UserClaims;
pub use identity::USER_ID_CLAIM;
pub use issuer::TokenIssuer;
pub use secret::JwtSecret;
pub use validator::TokenValidator;
pub use validator::VerifiedToken;

/// The only algorithm tokens are signed and accepted with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
