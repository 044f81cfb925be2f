/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → DB 接続 + migration → 依存生成 → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / CORS / security headers)
 * - axum::serve() で起動 (Ctrl+C / SIGTERM で graceful shutdown)
 * - 初期 admin の投入 (seed-admin)
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::{PgPetRepository, PgUserRepository, UserRepository};
use crate::services::auth::TokenService;
use crate::services::password::Argon2Hasher;
use crate::services::uploads::UploadStore;
use crate::state::AppState;
use crate::usecases::{CreateUser, CreateUserInput};
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,meupet_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn serve() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let pool = connect(&config).await?;
    let state = build_state(&config, pool);
    state
        .uploads
        .ensure_dir()
        .await
        .with_context(|| format!("creating uploads dir {}", config.uploads_dir.display()))?;

    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Create the initial admin account unless one with that e-mail exists.
pub async fn seed_admin(input: CreateUserInput) -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    let pool = connect(&config).await?;

    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
    if let Some(existing) = users.find_by_email(input.email.trim()).await? {
        tracing::info!(
            user_id = existing.id,
            role = %existing.role,
            "admin already exists, nothing to do"
        );
        return Ok(());
    }

    match CreateUser::new(users, Arc::new(Argon2Hasher::new()))
        .execute(input)
        .await
    {
        Ok(created) => {
            tracing::info!(user_id = created.id, role = %created.role, "admin created");
            Ok(())
        }
        Err(crate::usecases::UseCaseError::Validation(fields)) => {
            for field in fields.fields() {
                tracing::error!(field, message = fields.get(field), "invalid seed value");
            }
            anyhow::bail!("seed-admin rejected {} field(s)", fields.len())
        }
        Err(e) => Err(e.into()),
    }
}

async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connecting to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("running migrations")?;

    Ok(pool)
}

fn build_state(config: &Config, pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgPetRepository::new(pool)),
        Arc::new(Argon2Hasher::new()),
        Arc::new(TokenService::new(
            &config.jwt_secret,
            config.access_token_ttl_seconds,
        )),
        UploadStore::new(config.uploads_dir.clone()),
        config.admin_key.as_str(),
    )
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());

    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .nest_service("/uploads", uploads)
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.max_body_bytes)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
