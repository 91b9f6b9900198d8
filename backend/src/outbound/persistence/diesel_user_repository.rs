//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The `users.email` unique constraint decides conflicts. A violation on
//! insert or update surfaces as [`UserPersistenceError::EmailTaken`] and the
//! statement leaves the table unchanged. Attributes wider than their
//! `VARCHAR` column are rejected as [`UserPersistenceError::ValueTooLong`]
//! before a statement is sent, so PostgreSQL never truncates or errors on
//! them.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
///
/// Timestamps are taken from the injected clock so the Diesel and in-memory
/// adapters agree on `created_at`/`updated_at` semantics.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Map Diesel errors to user repository errors.
///
/// `email` names the value being written so unique violations can report it.
fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::email_taken(email.unwrap_or_default())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        if let Some(field) = new_user.overlong_attribute() {
            return Err(UserPersistenceError::value_too_long(field));
        }
        let mut conn = self.pool.get().await?;
        let now = self.clock.utc();
        let row = NewUserRow {
            email: &new_user.email,
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(|err| map_diesel_error(err, Some(&new_user.email)))
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await?;

        users::table
            .find(id.as_i32())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .map(User::from)
            .ok_or_else(|| UserPersistenceError::not_found(id.as_i32()))
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        if let Some(field) = user.overlong_attribute() {
            return Err(UserPersistenceError::value_too_long(field));
        }
        let mut conn = self.pool.get().await?;
        let changes = UserUpdate {
            email: user.email(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            updated_at: self.clock.utc(),
        };

        diesel::update(users::table.find(user.id().as_i32()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Some(user.email())))?
            .map(User::from)
            .ok_or_else(|| UserPersistenceError::not_found(user.id().as_i32()))
    }

    async fn delete(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await?;

        let removed = diesel::delete(users::table.find(user.id().as_i32()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        if removed == 0 {
            return Err(UserPersistenceError::not_found(user.id().as_i32()));
        }
        Ok(())
    }
}
