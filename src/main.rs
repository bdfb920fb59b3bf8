//! Waitroom waitlist signup service.
//!
//! Main entry point. Loads configuration, connects the signup store, and
//! serves the public signup endpoint until shutdown.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use waitroom_api::{AppState, Config};
use waitroom_core::{storage::PostgresSignupStore, RealClock};
use waitroom_notify::Notifier;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config.rust_log);

    info!("Starting waitroom waitlist service");
    info!(
        database_url = %config.database_url_masked(),
        host = %config.host,
        port = config.port,
        ntfy_topic = %config.ntfy_topic,
        source = %config.signup_source,
        "Configuration loaded"
    );

    let pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    run_migrations(&pool).await?;
    info!("Database migrations completed");

    let notifier =
        Notifier::new(config.to_notify_config()).context("Failed to build notification client")?;

    let state = AppState {
        store: Arc::new(PostgresSignupStore::new(pool.clone())),
        notifier: Arc::new(notifier),
        clock: Arc::new(RealClock::new()),
        source: config.signup_source.clone(),
    };

    let addr = config.parse_server_addr()?;
    waitroom_api::start_server(state, addr).await.context("Server failed")?;

    pool.close().await;
    info!("Waitroom shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
///
/// `RUST_LOG` wins when set; the configured default applies otherwise.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("Invalid log filter configuration");

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the database connection pool with retry logic.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    loop {
        match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connection_timeout))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                // Verify the connection actually works before serving traffic.
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(_e) if retries < MAX_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_RETRIES,
                    "Database connection failed, retrying..."
                );
                tokio::time::sleep(RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}

/// Runs database migrations.
///
/// The store is a single append-only key-value table; creation is
/// idempotent so restarts are safe.
async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS waitlist_entries (
            key TEXT PRIMARY KEY,
            value JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create waitlist_entries table")?;

    Ok(())
}
