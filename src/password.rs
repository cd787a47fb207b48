use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use std::sync::Arc;

use crate::error::AppError;

/// CredentialHasher
///
/// One-way password hashing capability. `hash` embeds a random salt, so the
/// same plaintext produces a different digest on every call; `verify` is the
/// only way back. Verification failure is reported as `false`, never as an
/// error, so the caller cannot distinguish a malformed digest from a wrong
/// password.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, AppError>;
    fn verify(&self, plain: &str, digest: &str) -> bool;
}

/// Argon2id implementation producing PHC-formatted digest strings.
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|e| AppError::Internal(format!("salt generation failed: {e}")))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AppError::Internal(format!("salt encoding failed: {e}")))?;
        let argon2 = Argon2::default();
        let phc = argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?
            .to_string();
        Ok(phc)
    }

    fn verify(&self, plain: &str, digest: &str) -> bool {
        if let Ok(parsed) = PasswordHash::new(digest) {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        } else {
            false
        }
    }
}

pub type HasherState = Arc<dyn CredentialHasher>;
