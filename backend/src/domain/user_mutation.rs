//! User mutation pipeline.
//!
//! [`UserMutationService`] implements the driving ports by validating the raw
//! request body, applying it to a single user, and persisting through the
//! injected [`UserRepository`]. Each call is independent; the only shared
//! state is the repository. Uniqueness is decided by the repository at write
//! time, so the service never checks for an existing email first.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    MutationResult, UserCommand, UserPersistenceError, UserQuery, UserRepository,
};
use crate::domain::validation::{FieldMap, FieldMode, UserFields, validate_user_fields};
use crate::domain::{Error, NewUser, User, UserId};

/// Message appended when the repository reports a duplicate email.
pub const EMAIL_TAKEN_MESSAGE: &str = "email is already taken";

/// User mutation service implementing [`UserCommand`] and [`UserQuery`].
#[derive(Clone)]
pub struct UserMutationService<R> {
    repo: Arc<R>,
}

impl<R> UserMutationService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> UserMutationService<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::ValueTooLong { field } => {
                Error::internal(format!("unexpected width failure for {field}"))
            }
            UserPersistenceError::EmailTaken { email } => {
                Error::internal(format!("unexpected email conflict for {email}"))
            }
            UserPersistenceError::NotFound { id } => Error::not_found(format!("user {id} not found")),
        }
    }

    /// Resolve `id`, turning a missing row into `Ok(None)`.
    async fn resolve(&self, id: UserId) -> Result<Option<User>, Error> {
        match self.repo.find_by_id(id).await {
            Ok(user) => Ok(Some(user)),
            Err(UserPersistenceError::NotFound { .. }) => {
                debug!(user_id = %id, "user not found");
                Ok(None)
            }
            Err(err) => {
                warn!(user_id = %id, error = %err, "user lookup failed");
                Err(Self::map_persistence_error(err))
            }
        }
    }

    fn too_long(field: &str) -> MutationResult {
        MutationResult::ValidationFailure(vec![format!("{field} is too long")])
    }

    fn conflict(mut errors: Vec<String>) -> MutationResult {
        errors.push(EMAIL_TAKEN_MESSAGE.to_owned());
        MutationResult::Conflict(errors)
    }
}

fn into_new_user(fields: UserFields) -> Option<NewUser> {
    let UserFields {
        first_name: Some(first_name),
        last_name: Some(last_name),
        email: Some(email),
    } = fields
    else {
        return None;
    };
    Some(NewUser {
        first_name,
        last_name,
        email,
    })
}

/// Copy supplied, non-blank values onto `user`; everything else is kept.
fn apply_supplied(user: &mut User, fields: UserFields) {
    let supplied = |value: Option<String>| value.filter(|text| !text.is_empty());
    if let Some(first_name) = supplied(fields.first_name) {
        user.set_first_name(first_name);
    }
    if let Some(last_name) = supplied(fields.last_name) {
        user.set_last_name(last_name);
    }
    if let Some(email) = supplied(fields.email) {
        user.set_email(email);
    }
}

#[async_trait]
impl<R> UserCommand for UserMutationService<R>
where
    R: UserRepository,
{
    async fn create(&self, input: &FieldMap) -> Result<MutationResult, Error> {
        let (state, fields) = validate_user_fields(input, FieldMode::Required);
        if !state.is_ok() {
            debug!(errors = ?state.errors(), "create rejected by validation");
            return Ok(MutationResult::ValidationFailure(state.into_errors()));
        }
        let Some(new_user) = into_new_user(fields) else {
            return Err(Error::internal("validated create input is incomplete"));
        };

        match self.repo.insert(&new_user).await {
            Ok(user) => {
                info!(user_id = %user.id(), "user created");
                Ok(MutationResult::Created(user))
            }
            Err(UserPersistenceError::ValueTooLong { field }) => {
                debug!(%field, "create rejected: value too long");
                Ok(Self::too_long(&field))
            }
            Err(UserPersistenceError::EmailTaken { .. }) => {
                debug!("create rejected: email already taken");
                Ok(Self::conflict(state.into_errors()))
            }
            Err(err) => {
                warn!(error = %err, "user insert failed");
                Err(Self::map_persistence_error(err))
            }
        }
    }

    async fn update(&self, id: UserId, input: &FieldMap) -> Result<MutationResult, Error> {
        let Some(mut user) = self.resolve(id).await? else {
            return Ok(MutationResult::NotFound);
        };

        let (state, fields) = validate_user_fields(input, FieldMode::Optional);
        if !state.is_ok() {
            debug!(user_id = %id, errors = ?state.errors(), "update rejected by validation");
            return Ok(MutationResult::ValidationFailure(state.into_errors()));
        }
        apply_supplied(&mut user, fields);

        match self.repo.update(&user).await {
            Ok(stored) => {
                info!(user_id = %id, "user updated");
                Ok(MutationResult::Updated(stored))
            }
            Err(UserPersistenceError::ValueTooLong { field }) => {
                debug!(user_id = %id, %field, "update rejected: value too long");
                Ok(Self::too_long(&field))
            }
            Err(UserPersistenceError::EmailTaken { .. }) => {
                debug!(user_id = %id, "update rejected: email already taken");
                Ok(Self::conflict(state.into_errors()))
            }
            Err(UserPersistenceError::NotFound { .. }) => Ok(MutationResult::NotFound),
            Err(err) => {
                warn!(user_id = %id, error = %err, "user update failed");
                Err(Self::map_persistence_error(err))
            }
        }
    }

    async fn delete(&self, id: UserId) -> Result<MutationResult, Error> {
        let Some(user) = self.resolve(id).await? else {
            return Ok(MutationResult::NotFound);
        };

        match self.repo.delete(&user).await {
            Ok(()) => {
                info!(user_id = %id, "user deleted");
                Ok(MutationResult::Deleted)
            }
            Err(UserPersistenceError::NotFound { .. }) => Ok(MutationResult::NotFound),
            Err(err) => {
                warn!(user_id = %id, error = %err, "user delete failed");
                Err(Self::map_persistence_error(err))
            }
        }
    }
}

#[async_trait]
impl<R> UserQuery for UserMutationService<R>
where
    R: UserRepository,
{
    async fn fetch(&self, id: UserId) -> Result<MutationResult, Error> {
        Ok(self
            .resolve(id)
            .await?
            .map_or(MutationResult::NotFound, MutationResult::Found))
    }
}

#[cfg(test)]
#[path = "user_mutation_tests.rs"]
mod tests;
