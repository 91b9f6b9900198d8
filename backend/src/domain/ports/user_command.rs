//! Driving ports for user mutations and lookups.
//!
//! Inbound adapters call these ports with the raw request body and the path
//! identifier. Expected outcomes (created, validation failure, conflict, not
//! found) come back as a [`MutationResult`]; only infrastructure faults are
//! returned as [`Error`].

use async_trait::async_trait;

use crate::domain::validation::FieldMap;
use crate::domain::{Error, User, UserId};

/// Coarse classification of a [`MutationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    /// The operation completed.
    Success,
    /// One or more fields failed validation.
    ValidationFailure,
    /// The store rejected a uniqueness violation.
    Conflict,
    /// The referenced user does not exist.
    NotFound,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationResult {
    /// A new user was stored.
    Created(User),
    /// An existing user was read.
    Found(User),
    /// An existing user was modified (possibly with no changes).
    Updated(User),
    /// The user was removed.
    Deleted,
    /// Field errors, in field-check order.
    ValidationFailure(Vec<String>),
    /// Errors including `"email is already taken"`.
    Conflict(Vec<String>),
    /// No user exists for the identifier.
    NotFound,
}

impl MutationResult {
    /// Classify the outcome.
    pub fn status(&self) -> MutationStatus {
        match self {
            Self::Created(_) | Self::Found(_) | Self::Updated(_) | Self::Deleted => {
                MutationStatus::Success
            }
            Self::ValidationFailure(_) => MutationStatus::ValidationFailure,
            Self::Conflict(_) => MutationStatus::Conflict,
            Self::NotFound => MutationStatus::NotFound,
        }
    }

    /// The affected user, for outcomes that carry one.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Created(user) | Self::Found(user) | Self::Updated(user) => Some(user),
            _ => None,
        }
    }

    /// Error messages; empty for successes and not-found.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::ValidationFailure(errors) | Self::Conflict(errors) => errors,
            _ => &[],
        }
    }
}

/// Use-case port for changing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Validate `input` in required mode and insert a new user.
    async fn create(&self, input: &FieldMap) -> Result<MutationResult, Error>;

    /// Resolve `id`, validate `input` in optional mode, and apply a partial
    /// update.
    async fn update(&self, id: UserId, input: &FieldMap) -> Result<MutationResult, Error>;

    /// Resolve `id` and remove the user.
    async fn delete(&self, id: UserId) -> Result<MutationResult, Error>;
}

/// Use-case port for reading a single user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Resolve `id` to a user.
    async fn fetch(&self, id: UserId) -> Result<MutationResult, Error>;
}
