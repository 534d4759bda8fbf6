use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{Role, UserEntity};

/// Claims carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Session id, revoked on logout.
    pub sid: Uuid,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signed token handed out at login together with its decoded claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// HS256 signing material and token lifetime.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Random per-process secret. Tokens do not survive a restart.
    pub fn ephemeral(ttl: Duration) -> Self {
        let secret: [u8; 32] = rand::random();
        Self::from_secret(&secret, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user` with a fresh session id.
    pub fn issue(&self, user: &UserEntity) -> Result<IssuedToken, TokenError> {
        self.issue_at(user, SystemTime::now())
    }

    fn issue_at(&self, user: &UserEntity, now: SystemTime) -> Result<IssuedToken, TokenError> {
        let iat = unix_seconds(now);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            sid: Uuid::new_v4(),
            iat,
            exp: iat + self.ttl.as_secs(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        Ok(IssuedToken { token, claims })
    }

    /// Check the signature and expiry of `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err),
            })
    }
}

pub(crate) fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserEntity {
        let now = SystemTime::now();
        UserEntity {
            id: Uuid::new_v4(),
            username: "neo".into(),
            email: "neo@arena.gg".into(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = TokenKeys::from_secret(b"test-secret", Duration::from_secs(60));
        let user = user();

        let issued = keys.issue(&user).unwrap();
        let claims = keys.verify(&issued.token).unwrap();

        assert_eq!(claims, issued.claims);
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn every_token_gets_its_own_session() {
        let keys = TokenKeys::from_secret(b"test-secret", Duration::from_secs(60));
        let user = user();
        let first = keys.issue(&user).unwrap();
        let second = keys.issue(&user).unwrap();
        assert_ne!(first.claims.sid, second.claims.sid);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::from_secret(b"test-secret", Duration::from_secs(60));
        let issued_at = SystemTime::now() - Duration::from_secs(3600);
        let issued = keys.issue_at(&user(), issued_at).unwrap();

        assert!(matches!(keys.verify(&issued.token), Err(TokenError::Expired)));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let keys = TokenKeys::from_secret(b"test-secret", Duration::from_secs(60));
        let other = TokenKeys::ephemeral(Duration::from_secs(60));
        let issued = other.issue(&user()).unwrap();

        assert!(matches!(keys.verify(&issued.token), Err(TokenError::Invalid(_))));
        assert!(matches!(keys.verify("not-a-jwt"), Err(TokenError::Invalid(_))));
    }
}
