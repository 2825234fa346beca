use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::crypto;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::claims::ClaimSet;
use super::codec::FromClaimSet;
use super::errors::JwtError;
use super::secret::JwtSecret;
use super::SIGNING_ALGORITHM;

/// Claims that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken<T> {
    pub claims: T,
    pub expires_at: DateTime<Utc>,
}

/// Verifies HS256 tokens and decodes their payload into a typed claims view.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

struct Segments<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
    signing_input: &'a str,
}

impl<'a> Segments<'a> {
    fn parse(token: &'a str) -> Result<Self, JwtError> {
        let mut parts = token.split('.');

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature), None)
                if !header.is_empty() && !payload.is_empty() =>
            {
                Ok(Self {
                    header,
                    payload,
                    signature,
                    signing_input: &token[..header.len() + 1 + payload.len()],
                })
            }
            _ => Err(JwtError::Malformed(
                "expected three dot-separated segments".to_string(),
            )),
        }
    }
}

impl TokenValidator {
    pub fn new(secret: &JwtSecret) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Validate a token against the current time.
    ///
    /// See [`TokenValidator::validate_at`].
    pub fn validate<T: FromClaimSet>(&self, token: &str) -> Result<VerifiedToken<T>, JwtError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token and decode its claims into `T`.
    ///
    /// Checks run in order and stop at the first failure:
    /// structure, algorithm, signature, expiration, claim shape.
    ///
    /// # Errors
    /// * `Malformed` - Not three base64url segments, or header/payload is not a JSON object
    /// * `UnsupportedAlgorithm` - Header names anything other than HS256 (including `none`)
    /// * `InvalidSignature` - Signature does not match header and payload
    /// * `MissingExpiration` - No numeric `exp` claim
    /// * `Expired` - `exp` is before `now`
    /// * `Decode` - Claims do not fit `T`
    pub fn validate_at<T: FromClaimSet>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken<T>, JwtError> {
        let segments = Segments::parse(token)?;

        let header: RawHeader = decode_segment(segments.header, "header")?;
        check_algorithm(&header.alg)?;

        // Constant-time comparison of the recomputed MAC.
        let signature_matches = crypto::verify(
            segments.signature,
            segments.signing_input.as_bytes(),
            &self.decoding_key,
            SIGNING_ALGORITHM,
        )
        .unwrap_or(false);
        if !signature_matches {
            return Err(JwtError::InvalidSignature);
        }

        let claim_set: ClaimSet = decode_segment(segments.payload, "payload")?;

        let expires_at = claim_set.expiration().ok_or(JwtError::MissingExpiration)?;
        if expires_at < now.timestamp() {
            return Err(JwtError::Expired(expires_at));
        }
        let expires_at = DateTime::from_timestamp(expires_at, 0)
            .ok_or_else(|| JwtError::Malformed("expiration out of range".to_string()))?;

        let claims = T::from_claim_set(&claim_set)?;

        Ok(VerifiedToken { claims, expires_at })
    }
}

fn check_algorithm(alg: &str) -> Result<(), JwtError> {
    match Algorithm::from_str(alg) {
        Ok(algorithm) if algorithm == SIGNING_ALGORITHM => Ok(()),
        _ => Err(JwtError::UnsupportedAlgorithm(alg.to_string())),
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, JwtError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| JwtError::Malformed(format!("{} is not base64url", name)))?;

    serde_json::from_slice(&bytes)
        .map_err(|_| JwtError::Malformed(format!("{} is not a JSON object", name)))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;
    use serde_json::json;

    use super::*;
    use crate::jwt::errors::ClaimError;
    use crate::jwt::identity::UserClaims;
    use crate::jwt::issuer::TokenIssuer;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn secret() -> JwtSecret {
        JwtSecret::new(SECRET).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn user_token(ttl: Duration) -> String {
        TokenIssuer::new(&secret())
            .issue_at(&UserClaims::claim_set("42"), ttl, now())
            .expect("Failed to issue token")
    }

    fn encode_json(value: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn test_round_trip() {
        let token = user_token(Duration::minutes(60));

        let verified: VerifiedToken<UserClaims> = TokenValidator::new(&secret())
            .validate_at(&token, now())
            .expect("Failed to validate token");

        assert_eq!(verified.claims.user_id, "42");
        assert_eq!(verified.claims.expires_at, now().timestamp() + 3600);
        assert_eq!(verified.expires_at, now() + Duration::minutes(60));
    }

    #[test]
    fn test_round_trip_against_wall_clock() {
        let issued_at = Utc::now();
        let token = TokenIssuer::new(&secret())
            .issue(&UserClaims::claim_set("42"), Duration::minutes(60))
            .unwrap();

        let verified: VerifiedToken<UserClaims> =
            TokenValidator::new(&secret()).validate(&token).unwrap();

        assert_eq!(verified.claims.user_id, "42");
        assert!(verified.claims.expires_at >= issued_at.timestamp() + 3600 - 1);
        assert!(verified.claims.expires_at <= Utc::now().timestamp() + 3600);
    }

    #[test]
    fn test_round_trip_keeps_extra_claims() {
        let claims = ClaimSet::new()
            .with_claim("userId", "7")
            .with_claim("role", "editor")
            .with_claim("level", 3i64);
        let token = TokenIssuer::new(&secret())
            .issue_at(&claims, Duration::minutes(1), now())
            .unwrap();

        let verified: VerifiedToken<ClaimSet> = TokenValidator::new(&secret())
            .validate_at(&token, now())
            .unwrap();

        assert_eq!(verified.claims.get("role"), Some(&json!("editor")));
        assert_eq!(verified.claims.get("level"), Some(&json!(3)));
        assert_eq!(verified.claims.expiration(), Some(now().timestamp() + 60));
    }

    #[test]
    fn test_tampered_signature_bits() {
        let token = user_token(Duration::minutes(60));
        let validator = TokenValidator::new(&secret());
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let signature_bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for bit in 0..signature_bytes.len() * 8 {
            let mut tampered = signature_bytes.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            let tampered_token =
                format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(&tampered));

            let result = validator.validate_at::<UserClaims>(&tampered_token, now());

            assert_eq!(result, Err(JwtError::InvalidSignature), "bit {}", bit);
        }
    }

    #[test]
    fn test_tampered_signature_characters() {
        let token = user_token(Duration::minutes(60));
        let validator = TokenValidator::new(&secret());
        let signature_start = token.rfind('.').unwrap() + 1;

        for position in signature_start..token.len() {
            let mut tampered = token.clone().into_bytes();
            tampered[position] = if tampered[position] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(tampered).unwrap();

            assert_eq!(
                validator.validate_at::<UserClaims>(&tampered, now()),
                Err(JwtError::InvalidSignature)
            );
        }
    }

    #[test]
    fn test_tampered_payload() {
        let token = user_token(Duration::minutes(60));
        let segments: Vec<&str> = token.split('.').collect();
        let forged_payload = encode_json(&json!({ "userId": "1", "exp": 1_800_000_000 }));
        let forged = format!("{}.{}.{}", segments[0], forged_payload, segments[2]);

        let result = TokenValidator::new(&secret()).validate_at::<UserClaims>(&forged, now());

        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_wrong_secret() {
        let token = user_token(Duration::minutes(60));
        let other = JwtSecret::new("another_secret_key_at_least_32_bytes").unwrap();

        let result = TokenValidator::new(&other).validate_at::<UserClaims>(&token, now());

        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_expired_token() {
        let validator = TokenValidator::new(&secret());
        let one_second_later = now() + Duration::seconds(1);

        for ttl in [Duration::zero(), Duration::minutes(-1)] {
            let token = user_token(ttl);
            let result = validator.validate_at::<UserClaims>(&token, one_second_later);
            assert!(matches!(result, Err(JwtError::Expired(_))));
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let token = user_token(Duration::minutes(1));
        let validator = TokenValidator::new(&secret());
        let expiry = now() + Duration::minutes(1);

        assert!(validator.validate_at::<UserClaims>(&token, expiry).is_ok());
        assert_eq!(
            validator.validate_at::<UserClaims>(&token, expiry + Duration::seconds(1)),
            Err(JwtError::Expired(expiry.timestamp()))
        );
    }

    #[test]
    fn test_missing_expiration() {
        // Signed correctly but produced without going through the issuer.
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "userId": "42" }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new(&secret()).validate_at::<UserClaims>(&token, now());

        assert_eq!(result, Err(JwtError::MissingExpiration));
    }

    #[test]
    fn test_non_numeric_expiration() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "userId": "42", "exp": "never" }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new(&secret()).validate_at::<UserClaims>(&token, now());

        assert_eq!(result, Err(JwtError::MissingExpiration));
    }

    #[test]
    fn test_claims_decode_failure() {
        let token = TokenIssuer::new(&secret())
            .issue_at(
                &ClaimSet::new().with_claim("sub", "42"),
                Duration::minutes(5),
                now(),
            )
            .unwrap();

        let result = TokenValidator::new(&secret()).validate_at::<UserClaims>(&token, now());

        assert_eq!(
            result,
            Err(JwtError::Decode(ClaimError::Missing("userId".to_string())))
        );
    }

    #[test]
    fn test_none_algorithm_rejected() {
        let header = encode_json(&json!({ "alg": "none", "typ": "JWT" }));
        let payload = encode_json(&json!({ "userId": "42", "exp": 1_800_000_000 }));
        let validator = TokenValidator::new(&secret());

        for token in [
            format!("{}.{}.", header, payload),
            format!("{}.{}.c2lnbmF0dXJl", header, payload),
        ] {
            assert_eq!(
                validator.validate_at::<UserClaims>(&token, now()),
                Err(JwtError::UnsupportedAlgorithm("none".to_string()))
            );
        }
    }

    #[test]
    fn test_other_algorithms_rejected() {
        let payload = encode_json(&json!({ "userId": "42", "exp": 1_800_000_000 }));
        let validator = TokenValidator::new(&secret());

        for alg in ["RS256", "ES256", "PS256", "EdDSA", "HS512", "hs256", ""] {
            let header = encode_json(&json!({ "alg": alg, "typ": "JWT" }));
            let token = format!("{}.{}.c2lnbmF0dXJl", header, payload);

            assert_eq!(
                validator.validate_at::<UserClaims>(&token, now()),
                Err(JwtError::UnsupportedAlgorithm(alg.to_string())),
                "alg {}",
                alg
            );
        }
    }

    #[test]
    fn test_hs512_signed_with_same_secret_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({ "userId": "42", "exp": 1_800_000_000 }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new(&secret()).validate_at::<UserClaims>(&token, now());

        assert_eq!(
            result,
            Err(JwtError::UnsupportedAlgorithm("HS512".to_string()))
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let validator = TokenValidator::new(&secret());
        let valid = user_token(Duration::minutes(5));
        let segments: Vec<&str> = valid.split('.').collect();

        let cases = [
            String::new(),
            "invalid".to_string(),
            "invalid.token".to_string(),
            "a.b.c.d".to_string(),
            format!(".{}.{}", segments[1], segments[2]),
            format!("{}..{}", segments[0], segments[2]),
            format!("!!!.{}.{}", segments[1], segments[2]),
            format!("{}.{}.{}", encode_json(&json!("HS256")), segments[1], segments[2]),
        ];

        for token in cases {
            assert!(
                matches!(
                    validator.validate_at::<UserClaims>(&token, now()),
                    Err(JwtError::Malformed(_))
                ),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_non_object_payload_with_valid_signature() {
        let header = encode_json(&json!({ "alg": "HS256", "typ": "JWT" }));
        let payload = encode_json(&json!("just a string"));
        let signing_input = format!("{}.{}", header, payload);
        let signature = crypto::sign(
            signing_input.as_bytes(),
            &EncodingKey::from_secret(SECRET),
            Algorithm::HS256,
        )
        .unwrap();
        let token = format!("{}.{}", signing_input, signature);

        let result = TokenValidator::new(&secret()).validate_at::<UserClaims>(&token, now());

        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }
}
