use lexhub::{
    AppConfig, AppState, Argon2Hasher, Clock, ClockState, CredentialHasher, HasherState,
    Repositories, Services, SystemClock, TokenService,
    config::Env,
    create_router,
    filters::normalize_email,
    models::{User, UserRole, UserStatus},
    repository::UserRepository,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// main
///
/// The asynchronous entry point: configuration, logging, database, state
/// wiring, admin seeding, and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & environment loading (fail-fast).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup. RUST_LOG wins; sensible defaults otherwise.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lexhub=debug,tower_http=info,axum=trace".into());

    // 3. Log format switched on the environment: pretty for humans locally,
    // JSON for log aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database initialization and schema migrations.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: database migration failed");

    // 5. Capabilities and state wiring. TokenService::new enforces the
    // minimum secret length, so a weak secret stops the boot here.
    let repos = Repositories::postgres(pool);
    let hasher: HasherState = Arc::new(Argon2Hasher);
    let clock: ClockState = Arc::new(SystemClock);
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_seconds)
        .expect("FATAL: invalid JWT configuration");
    let services = Services::new(&repos, hasher.clone(), tokens.clone(), clock.clone());

    // 6. Admin account seeding (create or upgrade, per configuration).
    seed_admin(&repos, &hasher, &clock, &config).await;

    let app_state = AppState {
        repos,
        services,
        tokens,
        clock,
        config,
    };

    // 7. Router and server startup.
    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:3000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}

/// seed_admin
///
/// Ensures the configured administrator account exists at startup: an
/// existing account is upgraded to ADMIN when needed, a missing one is
/// created ACTIVE with the configured password. Incomplete configuration
/// skips seeding with a warning instead of failing the boot.
async fn seed_admin(
    repos: &Repositories,
    hasher: &HasherState,
    clock: &ClockState,
    config: &AppConfig,
) {
    let seed = &config.admin;
    if !seed.enabled {
        return;
    }
    let email = normalize_email(&seed.email);
    if email.is_empty() {
        tracing::warn!("Admin seeding skipped: ADMIN_EMAIL is empty");
        return;
    }
    if seed.password.is_empty() {
        tracing::warn!("Admin seeding skipped: ADMIN_PASSWORD is empty");
        return;
    }

    match repos.users.find_by_email(&email).await {
        Ok(Some(mut existing)) => {
            if existing.role != UserRole::Admin {
                existing.role = UserRole::Admin;
                existing.updated_at = clock.now();
                if let Err(e) = repos.users.update(&existing).await {
                    tracing::error!("Admin seeding failed to upgrade user: {e}");
                } else {
                    tracing::info!("Admin seeding: upgraded existing user to ADMIN");
                }
            } else {
                tracing::info!("Admin seeding: admin already exists");
            }
        }
        Ok(None) => {
            let password_hash = match hasher.hash(&seed.password) {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!("Admin seeding failed to hash password: {e}");
                    return;
                }
            };
            let now = clock.now();
            let display_name = seed.display_name.trim();
            let admin = User {
                id: Uuid::new_v4(),
                email,
                username: None,
                password_hash,
                display_name: if display_name.is_empty() {
                    "Admin".to_string()
                } else {
                    display_name.to_string()
                },
                avatar_url: None,
                role: UserRole::Admin,
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
            if let Err(e) = repos.users.insert(&admin).await {
                tracing::error!("Admin seeding failed to create user: {e}");
            } else {
                tracing::info!("Admin seeding: created admin user");
            }
        }
        Err(e) => {
            tracing::error!("Admin seeding lookup failed: {e}");
        }
    }
}
