use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::filters::UserSearchFilter;
use crate::models::{Page, PageParams, User};

const USER_COLUMNS: &str = "id, email, username, password_hash, display_name, avatar_url, \
     role, status, locale, time_zone, daily_goal, preferences, last_login_at, \
     created_at, updated_at, deleted_at";

/// UserRepository
///
/// Persistence contract for user accounts. `find_live` variants exclude
/// soft-deleted rows; the plain variants see every row and exist for the
/// restore and seeding paths. Email comparisons expect the caller to have
/// normalized (lower-cased) the address already.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_live(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_live_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Global existence check, soft-deleted accounts included: email
    /// uniqueness survives deletion.
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;
    async fn insert(&self, user: &User) -> Result<(), AppError>;
    async fn update(&self, user: &User) -> Result<(), AppError>;
    /// Paged filtered search over non-deleted users.
    async fn search(
        &self,
        filter: &UserSearchFilter,
        page: &PageParams,
    ) -> Result<Page<User>, AppError>;
    /// Unpaged variant of `search` with identical filter semantics.
    async fn export(&self, filter: &UserSearchFilter) -> Result<Vec<User>, AppError>;
}

pub type UserRepositoryState = Arc<dyn UserRepository>;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends every present criterion as an AND-ed predicate. Absent criteria
/// are skipped entirely rather than matched with wildcards.
fn push_user_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserSearchFilter) {
    if let Some(email) = &filter.email {
        builder.push(" AND email ILIKE ");
        builder.push_bind(format!("%{email}%"));
    }
    if let Some(username) = &filter.username {
        builder.push(" AND username ILIKE ");
        builder.push_bind(format!("%{username}%"));
    }
    if let Some(display_name) = &filter.display_name {
        builder.push(" AND display_name ILIKE ");
        builder.push_bind(format!("%{display_name}%"));
    }
    if let Some(role) = filter.role {
        builder.push(" AND role = ");
        builder.push_bind(role);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_live(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_live_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, email, username, password_hash, display_name, avatar_url, \
             role, status, locale, time_zone, daily_goal, preferences, last_login_at, \
             created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(user.role)
        .bind(user.status)
        .bind(&user.locale)
        .bind(&user.time_zone)
        .bind(user.daily_goal)
        .bind(&user.preferences)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET email = $2, username = $3, password_hash = $4, display_name = $5, \
             avatar_url = $6, role = $7, status = $8, locale = $9, time_zone = $10, \
             daily_goal = $11, preferences = $12, last_login_at = $13, updated_at = $14, \
             deleted_at = $15 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(user.role)
        .bind(user.status)
        .bind(&user.locale)
        .bind(&user.time_zone)
        .bind(user.daily_goal)
        .bind(&user.preferences)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn search(
        &self,
        filter: &UserSearchFilter,
        page: &PageParams,
    ) -> Result<Page<User>, AppError> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL");
        push_user_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL"
        ));
        push_user_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let items = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            page: page.page(),
            per_page: page.per_page(),
            total,
        })
    }

    async fn export(&self, filter: &UserSearchFilter) -> Result<Vec<User>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL"
        ));
        push_user_filters(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        let users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
