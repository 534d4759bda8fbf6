use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use tokio::task;

use crate::error::ServiceError;

/// Hash `password` with Argon2id into a PHC string, off the async runtime.
pub async fn hash_password(password: String) -> Result<String, ServiceError> {
    task::spawn_blocking(move || {
        let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
            .map_err(|err| ServiceError::Internal(format!("failed to encode salt: {err}")))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))
    })
    .await
    .map_err(|err| ServiceError::Internal(format!("password hashing task failed: {err}")))?
}

/// Check `password` against a stored PHC hash. A malformed hash never verifies.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ServiceError> {
    task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(|err| ServiceError::Internal(format!("password verification task failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse".into()).await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("battery staple".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let first = hash_password("hunter22".into()).await.unwrap();
        let second = hash_password("hunter22".into()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hash_does_not_verify() {
        assert!(!verify_password("anything".into(), "plain".into()).await.unwrap());
    }
}
