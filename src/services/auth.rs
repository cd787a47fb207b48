use uuid::Uuid;

use crate::{
    clock::{Clock, ClockState},
    error::AppError,
    filters::normalize_email,
    models::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse, UserRole, UserStatus},
    password::{CredentialHasher, HasherState},
    repository::{UserRepository, UserRepositoryState},
    token::TokenService,
};

/// AuthService
///
/// Registration and login. The uniqueness check on register is global — a
/// soft-deleted account still owns its email address — and login resolves
/// the account among non-deleted users only, so a deleted account fails
/// exactly like an unknown one.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepositoryState,
    hasher: HasherState,
    tokens: TokenService,
    clock: ClockState,
}

impl AuthService {
    pub fn new(
        users: UserRepositoryState,
        hasher: HasherState,
        tokens: TokenService,
        clock: ClockState,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        let email = normalize_email(&request.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("A valid email is required".to_string()));
        }
        if request.password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::Validation("Display name is required".to_string()));
        }

        // Fast-path check; the unique index on email is the real backstop
        // against a concurrent registration.
        if self.users.exists_by_email(&email).await? {
            return Err(AppError::EmailExists);
        }

        let now = self.clock.now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            username: None,
            password_hash: self.hasher.hash(&request.password)?,
            display_name: display_name.to_string(),
            avatar_url: None,
            role: UserRole::User,
            status: UserStatus::Active,
            locale: None,
            time_zone: None,
            daily_goal: None,
            preferences: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.insert(&user).await?;
        Ok(user.into())
    }

    /// The "no such account" and "wrong password" paths return the identical
    /// error so the endpoint cannot be used to enumerate addresses.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&request.email);
        let mut user = self
            .users
            .find_live_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.hasher.verify(&request.password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        if user.status != UserStatus::Active {
            return Err(AppError::UserNotActive);
        }

        let now = self.clock.now();
        user.last_login_at = Some(now);
        user.updated_at = now;
        self.users.update(&user).await?;

        let access_token = self.tokens.issue(&user, now)?;
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_seconds(),
            user: user.into(),
        })
    }
}
