//! HTTP front end for the `jobly` repositories.

mod cli;
pub mod config;
pub mod error;
pub mod routes;

use anyhow::Context;
use axum::Router;
use deadpool_postgres::Pool;
use jobly::{JoblyResult, PasswordHasher};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

pub use config::Config;
pub use error::{ApiError, ApiResult};

const DEFAULT_LOG_FILTER: &str = "info,jobly.sql=debug";

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(pool: Pool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    /// Check a connection out of the pool.
    pub async fn client(&self) -> JoblyResult<deadpool_postgres::Client> {
        Ok(self.pool.get().await?)
    }
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let serve = match cli::parse_args(&args)? {
        cli::Command::Help => {
            cli::print_help();
            return Ok(());
        }
        cli::Command::Serve(serve) => serve,
    };

    let _ = dotenvy::dotenv();
    init_tracing();

    let mut config = Config::load(serve.config.as_deref())?;
    if let Some(bind) = serve.bind {
        config.server.bind = bind;
    }

    let pool = jobly::create_pool_with_config(&config.database.url, config.database.max_connections)
        .context("failed to create database pool")?;
    let state = AppState::new(pool, config.password_hasher());

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("cannot bind {}", config.server.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "jobly-server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("jobly-server stopped");
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
