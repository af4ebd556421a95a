use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::scopes::Scope;

/// Decode failures are distinct so the access guard can log the precise
/// cause, even though they all surface as the same 401 to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Payload embedded in an access token.
///
/// `scopes` is the set granted at issuance time and is frozen for the
/// token's lifetime; authorization decisions recompute scopes from the
/// live user record instead of trusting this claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject username
    pub sub: String,

    pub scopes: Vec<Scope>,

    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// Issues and decodes HS256-signed bearer tokens with a fixed TTL.
///
/// The signing secret is held process-wide; verification is stateless and
/// needs no store access.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no clock-skew grace window
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Mint a signed token for `username` carrying the granted scope set.
    pub fn issue(&self, username: &str, scopes: Vec<Scope>) -> Result<String, TokenError> {
        let expires_at = Utc::now() + self.ttl;
        self.issue_with_expiry(username, scopes, expires_at.timestamp())
    }

    fn issue_with_expiry(
        &self,
        username: &str,
        scopes: Vec<Scope>,
        exp: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: username.to_string(),
            scopes,
            exp,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode and verify a token, distinguishing tampered, expired, and
    /// unparseable inputs.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::scopes::scopes_for;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", 30)
    }

    #[test]
    fn issue_then_decode_recovers_claims() {
        let issuer = issuer();
        let token = issuer.issue("alice", scopes_for(false)).unwrap();

        let claims = issuer.decode(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.scopes, scopes_for(false));
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn superuser_token_carries_full_scope_set() {
        let issuer = issuer();
        let token = issuer.issue("root", scopes_for(true)).unwrap();

        let claims = issuer.decode(&token).unwrap();
        assert_eq!(claims.scopes, scopes_for(true));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let issuer = issuer();
        let exp = (Utc::now() - Duration::minutes(1)).timestamp();
        let token = issuer
            .issue_with_expiry("alice", scopes_for(false), exp)
            .unwrap();

        assert_eq!(issuer.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_token_is_rejected_as_invalid_signature() {
        let issuer = issuer();
        let token = issuer.issue("alice", scopes_for(false)).unwrap();

        // Flip one character of the payload; the signature no longer matches
        let parts: Vec<&str> = token.split('.').collect();
        let mut payload = parts[1].to_string();
        let swapped = if payload.starts_with('e') { 'f' } else { 'e' };
        payload.replace_range(0..1, &swapped.to_string());
        let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert_eq!(
            issuer.decode(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn wrong_secret_is_rejected_as_invalid_signature() {
        let token = issuer().issue("alice", scopes_for(false)).unwrap();
        let other = TokenIssuer::new("different-secret", 30);

        assert_eq!(other.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        let issuer = issuer();
        assert_eq!(issuer.decode("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(issuer.decode(""), Err(TokenError::Malformed));
    }
}
