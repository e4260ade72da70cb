/// JWT Claims structure
///
/// Payload shared by access and refresh tokens (RFC 7519). The subject is
/// the user's email, which is the stable identity the session layer keys on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user email, lowercased)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Unique token id. Two tokens for the same subject issued in the same
    /// second must still differ, or rotation could not tell them apart.
    pub jti: String,
}

impl Claims {
    /// Create claims expiring `expiry_seconds` from now.
    pub fn new(subject: &str, expiry_seconds: i64, issuer: &str) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("ann@x.com", 900, "mflix");

        assert_eq!(claims.sub, "ann@x.com");
        assert_eq!(claims.iss, "mflix");
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_token_ids_are_unique() {
        let a = Claims::new("ann@x.com", 900, "mflix");
        let b = Claims::new("ann@x.com", 900, "mflix");
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_claims() {
        let claims = Claims::new("ann@x.com", -10, "mflix");
        assert!(claims.is_expired());
    }
}
