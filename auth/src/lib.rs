//! Authentication core for the blog API
//!
//! Provides:
//! - Password hashing (Argon2id PHC strings; bcrypt hashes still verify)
//! - HS256 token issuance and validation over an open claim set
//! - An authentication gate that turns an `Authorization` header into a
//!   verified identity
//!
//! The gate depends on the user store only through [`UserLookup`]; the HTTP
//! service plugs its own repository in.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use blog_auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use blog_auth::{JwtSecret, TokenIssuer, TokenValidator, UserClaims};
//! use chrono::Duration;
//!
//! let secret = JwtSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let token = TokenIssuer::new(&secret)
//!     .issue(&UserClaims::claim_set("user123"), Duration::minutes(60))
//!     .unwrap();
//!
//! let verified = TokenValidator::new(&secret)
//!     .validate::<UserClaims>(&token)
//!     .unwrap();
//! assert_eq!(verified.claims.user_id, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use blog_auth::{Authenticator, JwtSecret, UserClaims};
//! use chrono::Duration;
//!
//! let secret = JwtSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, Duration::minutes(60));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth
//!     .authenticate("password123", &hash, &UserClaims::claim_set("user123"))
//!     .unwrap();
//!
//! // Validate token
//! let verified = auth.validate_token::<UserClaims>(&result.access_token).unwrap();
//! assert_eq!(verified.expires_at, result.expires_at);
//! ```

pub mod authenticator;
pub mod gate;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use gate::extract_bearer;
pub use gate::AuthGate;
pub use gate::AuthenticatedIdentity;
pub use gate::GateError;
pub use gate::LookupError;
pub use gate::RequestContext;
pub use gate::UserLookup;
pub use gate::UserRecord;
pub use gate::UNAUTHORIZED_MESSAGE;
pub use jwt::ClaimSet;
pub use jwt::ClaimValue;
pub use jwt::FromClaimSet;
pub use jwt::JwtError;
pub use jwt::JwtSecret;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use jwt::UserClaims;
pub use jwt::VerifiedToken;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
