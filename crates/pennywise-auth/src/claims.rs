//! JWT claim structure for session tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a session token.
///
/// # Fields
///
/// - `sub`: Account ID (subject)
/// - `iat`: Issued-at timestamp (Unix seconds)
/// - `exp`: Expiration timestamp (Unix seconds), always greater than `iat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID (subject claim)
    pub sub: String,
    /// Token issued-at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// The subject parsed as an account ID.
    pub fn subject_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether `now` is strictly before the expiry.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "account-id-123".to_string(),
            iat: 1234567800,
            exp: 1234567890,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"account-id-123""#));
        assert!(serialized.contains(r#""exp":1234567890"#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"account-id-456","iat":9999999900,"exp":9999999999}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "account-id-456");
        assert_eq!(claims.iat, 9999999900);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_subject_id() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            iat: 0,
            exp: 60,
        };
        assert_eq!(claims.subject_id().unwrap(), id);

        let bad = Claims {
            sub: "not-a-uuid".to_string(),
            ..claims
        };
        assert!(bad.subject_id().is_err());
    }

    #[test]
    fn test_is_live_at_boundary() {
        let claims = Claims {
            sub: String::new(),
            iat: 100,
            exp: 160,
        };
        let at = |secs| DateTime::from_timestamp(secs, 0).unwrap();
        assert!(claims.is_live_at(at(159)));
        assert!(!claims.is_live_at(at(160)));
        assert_eq!(claims.expires_at(), Some(at(160)));
    }
}
