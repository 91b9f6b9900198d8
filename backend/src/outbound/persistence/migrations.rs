//! Embedded schema migrations.
//!
//! Migrations under `backend/migrations/` are compiled into the binary and
//! applied over a synchronous `PgConnection` on a blocking thread, since
//! `diesel_migrations` does not drive async connections.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from the backend `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying or reverting migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },

    /// A migration failed to apply or revert.
    #[error("migration failed: {message}")]
    Apply { message: String },

    /// The blocking migration task did not complete.
    #[error("migration task aborted: {message}")]
    Task { message: String },
}

/// The single log line for a migration run; callers do not log versions.
fn report_applied(versions: &[String]) {
    if versions.is_empty() {
        info!("schema already up to date");
    } else {
        info!(count = versions.len(), ?versions, "applied pending migrations");
    }
}

fn establish(database_url: &str) -> Result<PgConnection, MigrationError> {
    PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
        message: err.to_string(),
    })
}

/// Apply every pending migration, returning the versions that ran.
pub fn run_pending_migrations_blocking(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn = establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    let versions: Vec<String> = applied.iter().map(ToString::to_string).collect();
    report_applied(&versions);
    Ok(versions)
}

/// Revert the most recently applied migration, returning its version.
pub fn revert_last_migration_blocking(database_url: &str) -> Result<String, MigrationError> {
    let mut conn = establish(database_url)?;
    let reverted = conn
        .revert_last_migration(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    let version = reverted.to_string();
    info!(%version, "reverted migration");
    Ok(version)
}

/// Apply pending migrations without blocking the async runtime.
pub async fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations_blocking(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })?
}
