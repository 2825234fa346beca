pub mod argon2;
pub mod errors;

pub use self::argon2::HashingCost;
pub use self::argon2::PasswordHasher;
pub use self::argon2::MAX_PASSWORD_BYTES;
pub use errors::PasswordError;
