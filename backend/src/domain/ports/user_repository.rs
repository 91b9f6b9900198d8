//! Port abstraction for user persistence adapters and their errors.
//!
//! The store is authoritative for email uniqueness. Adapters report a
//! duplicate email as [`UserPersistenceError::EmailTaken`] at write time and
//! leave the row untouched; callers never pre-check.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Outcomes other than success reported by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// An attribute is wider than its column allows.
        ValueTooLong { field: String } => "{field} exceeds its column width",
        /// Another row already holds this email.
        EmailTaken { email: String } => "email {email} is already taken",
        /// No row exists for the identifier.
        NotFound { id: i32 } => "user {id} not found",
    }
}

/// Single-row persistence operations for users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new row, assigning its id and timestamps.
    ///
    /// Fails with [`UserPersistenceError::EmailTaken`] when the email exists
    /// and with [`UserPersistenceError::ValueTooLong`] when an attribute is
    /// wider than its column; nothing is written in either case.
    async fn insert(&self, new_user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<User, UserPersistenceError>;

    /// Persist attribute changes already applied to `user`.
    ///
    /// Refreshes `updated_at` and returns the stored row. Column widths and
    /// email uniqueness are the only checks applied.
    async fn update(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Remove the row for `user`.
    async fn delete(&self, user: &User) -> Result<(), UserPersistenceError>;
}
