use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use listkeep_api::auth::issue_token;
use listkeep_api::config;
use listkeep_api::database::{schema, seed, DatabaseManager, MemoryStore, PgStore, Store};
use listkeep_api::{app, AppState};

#[derive(Parser)]
#[command(name = "listkeep-api")]
#[command(about = "Listkeep HTTP API server")]
#[command(version)]
struct ServeArgs {
    #[arg(long, help = "Keep everything in memory instead of PostgreSQL (data is lost on exit)")]
    memory: bool,

    #[arg(long, help = "Port to listen on (overrides LISTKEEP_PORT / PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.api.log_filter))
        .init();
    tracing::info!("Starting Listkeep API in {:?} mode", config.environment);

    let args = ServeArgs::parse();

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store: Arc<dyn Store> = if args.memory {
        let store = MemoryStore::new();
        let user = store.insert_user("demo", seed::SEED_EMAIL).await;
        let token = issue_token(&user).context("failed to issue demo token")?;
        tracing::warn!("In-memory store: data is discarded on exit");
        if !listkeep_api::is_development!() {
            tracing::warn!("Serving an in-memory store outside development");
        }
        tracing::info!("Demo user {} token: {}", user.email, token);
        Arc::new(store)
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        schema::ensure_schema(&pool).await.context("failed to prepare schema")?;
        Arc::new(PgStore::new(pool))
    };

    let router = app(AppState::from_config(store.clone()));

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listkeep API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
