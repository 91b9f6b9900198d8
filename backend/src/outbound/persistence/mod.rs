//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use contacts_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//! use mockable::DefaultClock;
//!
//! # async fn example() -> Result<(), contacts_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/contacts")).await?;
//! let repo = DieselUserRepository::new(pool, Arc::new(DefaultClock));
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, revert_last_migration_blocking, run_pending_migrations,
    run_pending_migrations_blocking,
};
pub use pool::{DbPool, PoolConfig, PoolError};
