//! Domain primitives, validation, and the user mutation pipeline.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, and the service that turns untyped request bodies into store
//! mutations.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - TraceId — per-request correlation identifier.
//! - User, NewUser, UserId — the user entity and its identifier.
//! - UserMutationService — create/fetch/update/delete over a repository.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_mutation;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ports::{MutationResult, MutationStatus};
pub use self::trace_id::TraceId;
pub use self::user::{EMAIL_MAX_CHARS, NAME_MAX_CHARS, NewUser, User, UserId, UserIdParseError};
pub use self::user_mutation::{EMAIL_TAKEN_MESSAGE, UserMutationService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use contacts_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
