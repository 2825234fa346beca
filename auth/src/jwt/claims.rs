use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use super::errors::ClaimError;

/// Name of the expiration claim (Unix timestamp, seconds).
pub const EXPIRATION_CLAIM: &str = "exp";

/// A single claim value accepted when building a [`ClaimSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    String(String),
    Number(Number),
    /// Stored as Unix seconds
    Timestamp(DateTime<Utc>),
}

impl From<ClaimValue> for Value {
    fn from(value: ClaimValue) -> Self {
        match value {
            ClaimValue::String(s) => Value::String(s),
            ClaimValue::Number(n) => Value::Number(n),
            ClaimValue::Timestamp(t) => Value::from(t.timestamp()),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ClaimValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<DateTime<Utc>> for ClaimValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Untyped token payload: claim name to value.
///
/// Serializes as a flat JSON object. Typed views are produced through
/// [`FromClaimSet`](super::FromClaimSet).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim (builder style).
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or overwrite a claim, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<Value> {
        self.0.insert(name.into(), value.into().into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read a required string claim.
    ///
    /// # Errors
    /// * `Missing` - Claim is absent
    /// * `WrongType` - Claim is not a string
    pub fn require_str(&self, name: &str) -> Result<&str, ClaimError> {
        match self.0.get(name) {
            None => Err(ClaimError::Missing(name.to_string())),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ClaimError::WrongType {
                claim: name.to_string(),
                expected: "a string",
            }),
        }
    }

    /// Read a required timestamp claim as Unix seconds.
    ///
    /// Fractional values are truncated toward zero.
    ///
    /// # Errors
    /// * `Missing` - Claim is absent
    /// * `WrongType` - Claim is not a number
    pub fn require_timestamp(&self, name: &str) -> Result<i64, ClaimError> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| ClaimError::Missing(name.to_string()))?;

        unix_seconds(value).ok_or_else(|| ClaimError::WrongType {
            claim: name.to_string(),
            expected: "a numeric timestamp",
        })
    }

    /// Expiration in Unix seconds, if present and numeric.
    pub fn expiration(&self) -> Option<i64> {
        self.0.get(EXPIRATION_CLAIM).and_then(unix_seconds)
    }

    /// Set the expiration claim, truncated to whole seconds.
    pub fn set_expiration(&mut self, expires_at: DateTime<Utc>) {
        self.insert(EXPIRATION_CLAIM, expires_at);
    }
}

fn unix_seconds(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };

    if let Some(seconds) = number.as_i64() {
        return Some(seconds);
    }

    // Other issuers may write the timestamp as a float.
    number
        .as_f64()
        .filter(|seconds| seconds.is_finite() && seconds.abs() < i64::MAX as f64)
        .map(|seconds| seconds.trunc() as i64)
}
