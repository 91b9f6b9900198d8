//! Shared parsing helpers for inbound HTTP adapters.
//!
//! User mutation bodies are validated field by field in the domain, so the
//! adapter only has to guarantee it hands over a JSON object. Path
//! identifiers that cannot name a user are reported as not found.

use serde_json::Value;

use crate::domain::validation::FieldMap;
use crate::domain::{Error, UserId};

/// Message returned when the body is not valid JSON.
pub(crate) const MALFORMED_BODY_MESSAGE: &str = "request body must be valid JSON";
/// Message returned when the body is JSON but not an object.
pub(crate) const NON_OBJECT_BODY_MESSAGE: &str = "request body must be a JSON object";

/// Parse a raw request body into an untyped field map.
///
/// An empty body is treated as `{}` so a bodiless `PATCH` is a no-op.
pub(crate) fn parse_field_map(body: &[u8]) -> Result<FieldMap, &'static str> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(NON_OBJECT_BODY_MESSAGE),
        Err(_) => Err(MALFORMED_BODY_MESSAGE),
    }
}

/// Parse a `{user_id}` path segment.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse::<UserId>()
        .map_err(|_| Error::not_found(format!("user {} not found", raw.trim())))
}
