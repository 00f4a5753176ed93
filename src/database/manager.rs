use once_cell::sync::OnceCell;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{self, DatabaseConfig};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the database could not be reached at all, as opposed to a failing query.
    pub fn is_connectivity(&self) -> bool {
        match self {
            DatabaseError::ConfigMissing(_) | DatabaseError::Unavailable(_) => true,
            DatabaseError::Sqlx(err) => matches!(
                err,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            ),
            _ => false,
        }
    }

    /// Postgres SQLSTATE of the underlying error, if any.
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
            _ => None,
        }
    }
}

/// SQLSTATE for foreign_key_violation
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for unique_violation
pub const UNIQUE_VIOLATION: &str = "23505";

/// Owner of the process-wide connection pool
pub struct DatabaseManager;

static POOL: OnceCell<PgPool> = OnceCell::new();

impl DatabaseManager {
    /// Shared pool, created on first use. Connections are opened lazily so the
    /// server can start while the database is still down.
    pub fn pool() -> Result<&'static PgPool, DatabaseError> {
        POOL.get_or_try_init(|| Self::connect_lazy(&config::config().database))
    }

    pub fn connect_lazy(settings: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if settings.url.trim().is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        let pool = Self::pool_options(settings).connect_lazy(&settings.url)?;
        info!(
            "Configured database pool (max_connections={})",
            settings.max_connections
        );
        Ok(pool)
    }

    /// Connect eagerly; used by the CLI where failing fast is preferable.
    pub async fn connect(settings: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if settings.url.trim().is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        let pool = Self::pool_options(settings).connect(&settings.url).await?;
        Ok(pool)
    }

    fn pool_options(settings: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool on shutdown, if it was ever created
    pub async fn close() {
        if let Some(pool) = POOL.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
