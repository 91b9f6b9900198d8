//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! helpers shared between suites live here and are pulled in with
//! `mod support;`.

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;

/// Render a `postgres` error including SQLSTATE, detail, and hint.
///
/// `postgres::Error`'s `Display` collapses database errors to `db error`,
/// which is useless in CI logs.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    for (label, value) in [("detail", db_error.detail()), ("hint", db_error.hint())] {
        if let Some(value) = value {
            summary.push_str(&format!("; {label}: {value}"));
        }
    }
    summary
}
