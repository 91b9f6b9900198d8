//! User entity and identifiers.
//!
//! Values reaching these types have already passed the field validator in
//! [`crate::domain::validation`]; the entity itself does not re-validate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned integer identifier for a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the underlying integer.
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raised when a path segment cannot be read as a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must be an integer, got {raw:?}")]
pub struct UserIdParseError {
    raw: String,
}

impl FromStr for UserId {
    type Err = UserIdParseError;

    /// Parse an identifier, ignoring surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use contacts_backend::domain::UserId;
    ///
    /// let id: UserId = " 42 ".parse().expect("integer id");
    /// assert_eq!(id.as_i32(), 42);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| UserIdParseError { raw: s.to_owned() })
    }
}

/// Widest given or family name a store accepts, in characters.
pub const NAME_MAX_CHARS: usize = 80;
/// Widest email a store accepts, in characters.
pub const EMAIL_MAX_CHARS: usize = 120;

/// First attribute wider than its column, in `first_name`, `last_name`,
/// `email` order.
fn overlong_attribute(first_name: &str, last_name: &str, email: &str) -> Option<&'static str> {
    let too_wide = |value: &str, max: usize| value.chars().count() > max;
    if too_wide(first_name, NAME_MAX_CHARS) {
        Some("first_name")
    } else if too_wide(last_name, NAME_MAX_CHARS) {
        Some("last_name")
    } else if too_wide(email, EMAIL_MAX_CHARS) {
        Some("email")
    } else {
        None
    }
}

/// Attributes supplied when creating a user; the store assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email, unique across all users.
    pub email: String,
}

impl NewUser {
    /// Name of the first attribute exceeding its column width, if any.
    pub fn overlong_attribute(&self) -> Option<&'static str> {
        overlong_attribute(&self.first_name, &self.last_name, &self.email)
    }
}

/// Persisted application user.
///
/// ## Invariants
/// - `email` is unique across users; the store enforces this.
/// - `id`, `created_at` and `updated_at` are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from its stored parts.
    pub fn new(
        id: UserId,
        attributes: NewUser,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let NewUser {
            first_name,
            last_name,
            email,
        } = attributes;
        Self {
            id,
            first_name,
            last_name,
            email,
            created_at,
            updated_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Unique contact email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the given name.
    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    /// Replace the family name.
    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    /// Replace the email. Uniqueness is checked when the store persists it.
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    /// Name of the first attribute exceeding its column width, if any.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use contacts_backend::domain::{NewUser, User, UserId};
    ///
    /// let attributes = NewUser {
    ///     first_name: "A".repeat(81),
    ///     last_name: "B".to_owned(),
    ///     email: "a@b.com".to_owned(),
    /// };
    /// let user = User::new(UserId::new(1), attributes, Utc::now(), Utc::now());
    /// assert_eq!(user.overlong_attribute(), Some("first_name"));
    /// ```
    pub fn overlong_attribute(&self) -> Option<&'static str> {
        overlong_attribute(&self.first_name, &self.last_name, &self.email)
    }

    /// Record a modification time.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
