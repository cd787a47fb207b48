use uuid::Uuid;

use crate::{
    clock::{Clock, ClockState},
    error::AppError,
    filters::{UserSearchFilter, normalize_email},
    models::{
        AdminUpdateUserRequest, Page, PageParams, UpdateMeRequest, User, UserResponse, UserStatus,
    },
    password::{CredentialHasher, HasherState},
    repository::{UserRepository, UserRepositoryState},
    token::Principal,
};

/// UserService
///
/// Profile self-service plus the admin user-management operations. Every
/// lookup goes through the live (non-deleted) variant, so a soft-deleted
/// account is indistinguishable from one that never existed — except for
/// `restore`, which deliberately reaches past the marker.
#[derive(Clone)]
pub struct UserService {
    users: UserRepositoryState,
    hasher: HasherState,
    clock: ClockState,
}

impl UserService {
    pub fn new(users: UserRepositoryState, hasher: HasherState, clock: ClockState) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    async fn get_live(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_live(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn get_me(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        Ok(self.get_live(user_id).await?.into())
    }

    pub async fn update_me(
        &self,
        user_id: Uuid,
        request: UpdateMeRequest,
    ) -> Result<UserResponse, AppError> {
        let mut user = self.get_live(user_id).await?;

        if let Some(username) = request.username {
            user.username = Some(username.trim().to_string());
        }
        if let Some(display_name) = request.display_name {
            user.display_name = display_name.trim().to_string();
        }
        if let Some(avatar_url) = request.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(locale) = request.locale {
            user.locale = Some(locale);
        }
        if let Some(time_zone) = request.time_zone {
            user.time_zone = Some(time_zone);
        }
        if let Some(daily_goal) = request.daily_goal {
            user.daily_goal = Some(daily_goal);
        }

        user.updated_at = self.clock.now();
        self.users.update(&user).await?;
        Ok(user.into())
    }

    // --- Admin operations; each takes the caller explicitly. ---

    pub async fn list(
        &self,
        caller: &Principal,
        filter: UserSearchFilter,
        page: PageParams,
    ) -> Result<Page<UserResponse>, AppError> {
        caller.require_admin()?;
        let users = self.users.search(&filter.normalized(), &page).await?;
        Ok(users.map(UserResponse::from))
    }

    pub async fn export(
        &self,
        caller: &Principal,
        filter: UserSearchFilter,
    ) -> Result<Vec<UserResponse>, AppError> {
        caller.require_admin()?;
        let users = self.users.export(&filter.normalized()).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn admin_update(
        &self,
        caller: &Principal,
        user_id: Uuid,
        request: AdminUpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        caller.require_admin()?;
        let mut user = self.get_live(user_id).await?;

        if let Some(email) = request.email {
            let email = normalize_email(&email);
            if email != user.email {
                // The moved-to address must be free across all accounts,
                // soft-deleted ones included.
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(AppError::EmailExists);
                }
                user.email = email;
            }
        }
        if let Some(username) = request.username {
            user.username = Some(username.trim().to_string());
        }
        if let Some(display_name) = request.display_name {
            user.display_name = display_name.trim().to_string();
        }
        if let Some(avatar_url) = request.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(status) = request.status {
            user.status = status;
        }
        if let Some(locale) = request.locale {
            user.locale = Some(locale);
        }
        if let Some(time_zone) = request.time_zone {
            user.time_zone = Some(time_zone);
        }
        if let Some(daily_goal) = request.daily_goal {
            user.daily_goal = Some(daily_goal);
        }

        user.updated_at = self.clock.now();
        self.users.update(&user).await?;
        Ok(user.into())
    }

    /// Soft delete: the row stays, the account disappears. Forces INACTIVE so
    /// a later restore does not silently reactivate a suspended login.
    pub async fn delete(&self, caller: &Principal, user_id: Uuid) -> Result<(), AppError> {
        caller.require_admin()?;
        let mut user = self.get_live(user_id).await?;
        let now = self.clock.now();
        user.deleted_at = Some(now);
        user.status = UserStatus::Inactive;
        user.updated_at = now;
        self.users.update(&user).await?;
        Ok(())
    }

    /// Clears the soft-delete marker and forces ACTIVE. Idempotent: restoring
    /// a user that was never deleted returns the account unchanged.
    pub async fn restore(
        &self,
        caller: &Principal,
        user_id: Uuid,
    ) -> Result<UserResponse, AppError> {
        caller.require_admin()?;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if user.deleted_at.is_none() {
            return Ok(user.into());
        }
        user.deleted_at = None;
        user.status = UserStatus::Active;
        user.updated_at = self.clock.now();
        self.users.update(&user).await?;
        Ok(user.into())
    }

    pub async fn reset_password(
        &self,
        caller: &Principal,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        caller.require_admin()?;
        if new_password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        let mut user = self.get_live(user_id).await?;
        user.password_hash = self.hasher.hash(new_password)?;
        user.updated_at = self.clock.now();
        self.users.update(&user).await?;
        Ok(())
    }
}
