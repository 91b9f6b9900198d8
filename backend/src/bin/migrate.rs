//! Apply or revert the embedded schema migrations.
//!
//! ```text
//! migrate up   --database-url postgres://contacts@localhost/contacts
//! migrate down
//! ```
//!
//! The URL falls back to `CONTACTS_DATABASE_URL`.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use contacts_backend::outbound::persistence::{
    revert_last_migration_blocking, run_pending_migrations_blocking,
};

#[derive(Debug, Parser)]
#[command(name = "migrate", about = "Manage the contacts database schema")]
struct Cli {
    /// PostgreSQL connection URL.
    #[arg(long, env = "CONTACTS_DATABASE_URL", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply every pending migration.
    Up,
    /// Revert the most recently applied migration.
    Down,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .ok_or_else(|| color_eyre::eyre::eyre!("--database-url or CONTACTS_DATABASE_URL is required"))?;

    match cli.command {
        Command::Up => {
            run_pending_migrations_blocking(&database_url).wrap_err("failed to apply migrations")?;
        }
        Command::Down => {
            revert_last_migration_blocking(&database_url).wrap_err("failed to revert migration")?;
        }
    }
    Ok(())
}
