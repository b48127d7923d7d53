use std::time::Duration;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub mod password;

/// Identity claim carried inside a signed token. Never persisted server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claim for `subject` expiring `ttl` from now. Fails when the expiry
    /// falls outside the representable time range.
    pub fn new(subject: Uuid, ttl: Duration) -> Result<Self, TokenError> {
        let out_of_range = || TokenError::Signing(format!("token lifetime {:?} out of range", ttl));

        let ttl = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(out_of_range)?;
        let now = Utc::now();
        let exp = now.checked_add_signed(ttl).ok_or_else(out_of_range)?;

        Ok(Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    pub fn subject(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Signs and verifies identity tokens with a symmetric key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, security.jwt_ttl())
    }

    /// Mint a token for `subject` that expires after the configured ttl.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        self.encode(&Claims::new(subject, self.ttl)?)
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        // A claim we cannot attribute to a user is as good as unreadable.
        token_data.claims.subject()?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret, Duration::from_secs(360_000))
    }

    #[test]
    fn issued_token_decodes_to_same_subject() {
        let codec = codec("test-secret");
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id).unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.subject().unwrap(), user_id);
        assert_eq!(claims.exp - claims.iat, 360_000);
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let token = codec("key-one").issue(Uuid::new_v4()).unwrap();
        assert_eq!(codec("key-two").decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let codec = codec("test-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 120,
            exp: now - 60,
        };

        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn unrepresentable_lifetime_is_an_error_not_a_panic() {
        for secs in [10_000_000_000_000, 10_000_000_000_000_000, u64::MAX] {
            let codec = TokenCodec::new("test-secret", Duration::from_secs(secs));
            assert!(matches!(codec.issue(Uuid::new_v4()), Err(TokenError::Signing(_))));
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec("test-secret");
        assert_eq!(codec.decode("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(codec.decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn non_uuid_subject_is_malformed() {
        let codec = codec("test-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            iat: now,
            exp: now + 60,
        };

        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let codec = codec("test-secret");
        let token = codec.issue(Uuid::new_v4()).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(codec.decode(&tampered), Err(TokenError::InvalidSignature));
    }
}
