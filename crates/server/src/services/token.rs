//! Bearer token issuance and validation.
//!
//! Tokens are signed, time-limited JWTs whose subject is the seller's email.
//! They are stateless: there is no server-side revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use marketstall_core::Email;

/// Errors from token signing or validation.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("failed to sign token")]
    Issue(#[source] jsonwebtoken::errors::Error),

    /// The token is malformed, has a bad signature, or has expired.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the seller's email address.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Issued-at as a unix timestamp.
    pub iat: i64,
}

/// Signs and validates bearer tokens with a shared HS256 secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer from the configured secret and lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a seller.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Issue` if signing fails.
    pub fn issue(&self, subject: &Email) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.as_str().to_owned(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Issue)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, malformed token, or
    /// expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer(ttl_hours: i64) -> TokenSigner {
        TokenSigner::new(&SecretString::from("k9PqB2vX7mWz4RtY8nLc3JhF6dGs1AeU"), ttl_hours)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let signer = signer(24);
        let email = Email::parse("seller@example.com").unwrap();

        let token = signer.issue(&email).unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.sub, "seller@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let signer = signer(24);
        assert!(matches!(
            signer.verify("not-a-token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let email = Email::parse("seller@example.com").unwrap();
        let token = signer(24).issue(&email).unwrap();

        let other = TokenSigner::new(&SecretString::from("Zq8WvN4xTy2KmP6rLc9JhB3dGf7sAe1U"), 24);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let email = Email::parse("seller@example.com").unwrap();
        // Negative TTL produces an already-expired token.
        let token = signer(-1).issue(&email).unwrap();

        assert!(matches!(
            signer(24).verify(&token),
            Err(TokenError::Invalid(_))
        ));
    }
}
