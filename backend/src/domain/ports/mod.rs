//! Domain ports for the hexagonal boundary.
//!
//! Driven port: [`UserRepository`] (implemented by outbound persistence
//! adapters). Driving ports: [`UserCommand`] and [`UserQuery`] (called by
//! inbound HTTP handlers).

mod macros;
pub(crate) use macros::define_port_error;

mod user_command;
mod user_repository;

#[cfg(test)]
pub use user_command::{MockUserCommand, MockUserQuery};
pub use user_command::{MutationResult, MutationStatus, UserCommand, UserQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
