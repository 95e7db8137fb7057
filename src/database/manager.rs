use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the connection pool for the application database.
///
/// Built once by the composition root; stores receive a clone of the pool.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Create the pool. Connections are opened lazily so the server can start
    /// (and report a degraded /health) while the database is still coming up.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let connection_string = Self::build_connection_string(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&connection_string)?;

        info!(
            "Created database pool for {}:{}/{}",
            config.host, config.port, config.name
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Apply the embedded migrations in ./migrations
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    fn build_connection_string(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        if let Some(url) = &config.url {
            url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
            return Ok(url.clone());
        }

        if config.host.is_empty() {
            return Err(DatabaseError::ConfigMissing("POSTGRES_IP"));
        }
        if config.name.is_empty() {
            return Err(DatabaseError::ConfigMissing("POSTGRES_DB"));
        }

        let mut url = url::Url::parse("postgres://localhost")
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_host(Some(&config.host))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_port(Some(config.port))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_username(&config.user)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !config.password.is_empty() {
            url.set_password(Some(&config.password))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        url.set_path(&format!("/{}", config.name));
        url.query_pairs_mut().append_pair("sslmode", "disable");

        Ok(url.into())
    }
}
