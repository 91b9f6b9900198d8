//! In-process `UserRepository` used when no database is configured.
//!
//! Rows live in a mutex-guarded ordered map keyed by id. Ids are assigned
//! sequentially from 1 and never reused. Email uniqueness is exact-match
//! (case-sensitive), and attribute widths follow the `VARCHAR` limits of the
//! PostgreSQL schema, so both stores accept and reject the same rows.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

#[derive(Default)]
struct Rows {
    last_id: i32,
    users: BTreeMap<i32, User>,
}

impl Rows {
    fn email_owner(&self, email: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|user| user.email() == email)
            .map(User::id)
    }
}

/// Mutex-backed user store.
pub struct InMemoryUserRepository {
    rows: Mutex<Rows>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Mutex::new(Rows::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows>, UserPersistenceError> {
        self.rows
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store poisoned"))
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.rows.lock().map_or(0, |rows| rows.users.len())
    }

    /// True when no users are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: &NewUser) -> Result<User, UserPersistenceError> {
        if let Some(field) = new_user.overlong_attribute() {
            return Err(UserPersistenceError::value_too_long(field));
        }
        let mut rows = self.lock()?;
        if rows.email_owner(&new_user.email).is_some() {
            return Err(UserPersistenceError::email_taken(new_user.email.clone()));
        }
        let id = rows
            .last_id
            .checked_add(1)
            .ok_or_else(|| UserPersistenceError::query("user id sequence exhausted"))?;
        let now = self.clock.utc();
        let user = User::new(UserId::new(id), new_user.clone(), now, now);
        rows.last_id = id;
        rows.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserPersistenceError> {
        let rows = self.lock()?;
        rows.users
            .get(&id.as_i32())
            .cloned()
            .ok_or_else(|| UserPersistenceError::not_found(id.as_i32()))
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut rows = self.lock()?;
        let id = user.id();
        if !rows.users.contains_key(&id.as_i32()) {
            return Err(UserPersistenceError::not_found(id.as_i32()));
        }
        if let Some(field) = user.overlong_attribute() {
            return Err(UserPersistenceError::value_too_long(field));
        }
        if rows
            .email_owner(user.email())
            .is_some_and(|owner| owner != id)
        {
            return Err(UserPersistenceError::email_taken(user.email()));
        }
        let mut stored = user.clone();
        stored.touch(self.clock.utc());
        rows.users.insert(id.as_i32(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut rows = self.lock()?;
        rows.users
            .remove(&user.id().as_i32())
            .map(|_| ())
            .ok_or_else(|| UserPersistenceError::not_found(user.id().as_i32()))
    }
}

#[cfg(test)]
mod tests;
