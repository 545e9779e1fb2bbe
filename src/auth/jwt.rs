//! JWT issuance and validation for admin sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::{BistroError, BistroResult};

/// JWT claims for an authenticated admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin username).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

/// JWT token manager.
///
/// Pure over the configured secret: no state beyond the keys, safe to
/// clone into every request handler.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in minutes.
    token_ttl_minutes: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_ttl_minutes,
        }
    }

    /// Generate a signed token for an admin.
    pub fn generate_token(&self, username: &str) -> BistroResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.token_ttl_minutes);

        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| BistroError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    ///
    /// Distinguishes an expired signature from every other failure so the
    /// caller can report "Expired token" vs "Invalid token".
    pub fn validate_token(&self, token: &str) -> BistroResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        // No clock leeway: a token past its expiry is expired.
        validation.leeway = 0;

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => BistroError::ExpiredToken,
                    _ => BistroError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-12345";

    fn manager() -> JwtManager {
        JwtManager::new(SECRET, "bistro-core".to_string(), 30)
    }

    #[test]
    fn test_token_roundtrip() {
        let manager = manager();

        let token = manager.generate_token("admin").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, "bistro-core");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = manager();

        // Hand-encode claims that expired a minute ago, signed with the
        // same secret.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            exp: now - 60,
            iat: now - 120,
            iss: "bistro-core".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match manager.validate_token(&token) {
            Err(BistroError::ExpiredToken) => {}
            other => panic!("expected ExpiredToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token("admin").unwrap();

        let other = JwtManager::new("a-different-secret", "bistro-core".to_string(), 30);
        match other.validate_token(&token) {
            Err(BistroError::InvalidToken) => {}
            other => panic!("expected InvalidToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = manager().generate_token("admin").unwrap();

        let other = JwtManager::new(SECRET, "someone-else".to_string(), 30);
        assert!(matches!(
            other.validate_token(&token),
            Err(BistroError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(matches!(
            manager().validate_token("not-a-token"),
            Err(BistroError::InvalidToken)
        ));
        assert!(matches!(
            manager().validate_token(""),
            Err(BistroError::InvalidToken)
        ));
    }
}
