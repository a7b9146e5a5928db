/// PostgreSQL connection pooling
///
/// One pool per process, created at startup and handed to every handler
/// through the application state. Creation pings the database so a bad
/// `DATABASE_URL` fails the boot instead of the first request.
///
/// # Example
///
/// ```no_run
/// use taskpoints_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///     Ok(())
/// }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Pool tuning knobs
///
/// Durations are plain seconds so they map one-to-one onto environment
/// variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// Idle connections kept warm
    pub min_connections: u32,

    /// How long an acquire may wait before giving up (seconds)
    pub connect_timeout_seconds: u64,

    /// Idle cutoff; `None` keeps idle connections forever (seconds)
    pub idle_timeout_seconds: Option<u64>,

    /// Recycle age; `None` never recycles (seconds)
    pub max_lifetime_seconds: Option<u64>,

    /// Ping connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

/// Opens a connection pool and verifies it with a round-trip query
///
/// # Errors
///
/// Fails when the URL does not parse, the server is unreachable, or the
/// verification query returns anything unexpected.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max = config.max_connections,
        min = config.min_connections,
        acquire_timeout_s = config.connect_timeout_seconds,
        "opening database pool"
    );

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .test_before_acquire(config.test_before_acquire);

    if let Some(secs) = config.idle_timeout_seconds {
        options = options.idle_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.max_lifetime_seconds {
        options = options.max_lifetime(Duration::from_secs(secs));
    }

    let pool = options.connect(&config.url).await?;
    health_check(&pool).await?;

    info!("database pool ready");
    Ok(pool)
}

/// Round-trip query confirming the database answers
///
/// # Errors
///
/// Propagates the query error, or reports a protocol error if the answer
/// is not the literal `1`.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (answer,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if answer != 1 {
        return Err(sqlx::Error::Protocol(format!(
            "health probe returned {answer}"
        )));
    }

    debug!("database health probe ok");
    Ok(())
}

/// Drains and closes the pool at shutdown
pub async fn close_pool(pool: PgPool) {
    info!("closing database pool");
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = DatabaseConfig::default();
        assert!(config.max_connections >= config.min_connections);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout_seconds, 30);
        assert_eq!(config.idle_timeout_seconds, Some(600));
        assert_eq!(config.max_lifetime_seconds, Some(1800));
        assert!(config.test_before_acquire);
    }

    // Anything needing a live server runs from taskpoints-api/tests.
}
