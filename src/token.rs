use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{User, UserRole},
};

/// Claims
///
/// The payload signed into every session token. `sub` is the user's UUID;
/// email and role ride along so the principal can be reconstructed without a
/// storage round-trip where a fresh lookup is not required.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Issued At: seconds since the Unix epoch.
    pub iat: usize,
    /// Expiration Time: `iat` plus the configured TTL.
    pub exp: usize,
}

/// Principal
///
/// The identity extracted from a validated token: who is calling and with
/// which role. Admin-gated service operations take this explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl Principal {
    /// Capability check for admin-only operations.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::AccessDenied)
        }
    }
}

/// TokenService
///
/// Issues and validates stateless HS256 session tokens. Construction fails
/// fast on a secret shorter than 256 bits; there is no server-side
/// revocation, so a token stays valid until its expiry.
#[derive(Clone, Debug)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self, AppError> {
        if secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret must be at least 32 bytes".to_string(),
            ));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Signs a token for the given user. `now` is injected so issuance stays
    /// deterministic under test.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String, AppError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: iat as usize,
            exp: (iat + self.ttl_seconds) as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    /// Verifies signature and expiry. Every failure mode collapses to `None`:
    /// the caller must not be able to distinguish "expired" from "malformed"
    /// from "tampered".
    pub fn validate(&self, token: &str) -> Option<Principal> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding_key, &validation).ok()?;
        Some(Principal {
            id: data.claims.sub,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}
