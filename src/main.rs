use clap::Parser;
use tracing_subscriber::EnvFilter;

use superlists_api::api::{app, AppState};
use superlists_api::config;
use superlists_api::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "superlists-api")]
#[command(about = "Shared shopping lists HTTP API")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides API_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Keep all data in process memory instead of PostgreSQL")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, POSTGRES_*, JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting superlists-api in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; login will fail until it is configured");
    }

    let state = if cli.in_memory {
        tracing::info!("Using in-memory stores");
        AppState::in_memory(config.security.clone())
    } else {
        let database = DatabaseManager::connect(&config.database)?;
        if config.database.run_migrations {
            // Keep serving; /health reports the database as unavailable
            if let Err(e) = database.migrate().await {
                tracing::error!("Failed to run migrations: {}", e);
            }
        }
        AppState::postgres(database, config.security.clone())
    };

    let database = state.database.clone();
    let router = app(state, config);

    let port = cli.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("superlists-api listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
