//! Users CRUD backend built around a validated mutation pipeline.
//!
//! Requests flow through the HTTP adapter into
//! [`domain::UserMutationService`], which validates the supplied fields and
//! drives a [`domain::ports::UserRepository`] implemented by the PostgreSQL or
//! in-memory adapters under [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
