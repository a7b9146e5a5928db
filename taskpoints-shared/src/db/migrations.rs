/// Schema migration runner
///
/// The SQL files under this crate's `migrations/` directory are compiled
/// into the binary; `run_migrations` applies whatever is still pending at
/// startup, before the server takes traffic.

use sqlx::postgres::PgPool;
use tracing::{error, info};

/// Applies pending migrations
///
/// # Errors
///
/// Returns the migrator's error when a statement fails or the checksum of
/// an already-applied migration no longer matches its file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("applying pending migrations");

    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        error!("migration run failed: {e}");
        return Err(e);
    }

    info!("schema is up to date");
    Ok(())
}
