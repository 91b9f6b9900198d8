//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users            {"first_name":"Ada","last_name":"Lovelace","email":"ada@example.com"}
//! GET    /api/v1/users/{user_id}
//! PATCH  /api/v1/users/{user_id}  {"last_name":"Byron"}
//! DELETE /api/v1/users/{user_id}
//! ```
//!
//! Validation failures and email conflicts share one body shape,
//! `{"success":false,"error":400,"errors":[...]}`, on both create and update.
//! Missing users and infrastructure faults use the domain error envelope.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, MutationResult, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserFieldsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_field_map, parse_user_id};

/// User representation returned on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPayload {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Always `true`.
    pub success: bool,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_i32(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            email: user.email().to_owned(),
            success: true,
        }
    }
}

/// Body returned for validation failures and email conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MutationFailureBody {
    /// Always `false`.
    pub success: bool,
    /// Mirrors the HTTP status, always `400`.
    #[schema(example = 400)]
    pub error: u16,
    /// One message per rejected field, plus `"email is already taken"` on
    /// conflict.
    pub errors: Vec<String>,
}

impl MutationFailureBody {
    fn new(errors: Vec<String>) -> Self {
        Self {
            success: false,
            error: StatusCode::BAD_REQUEST.as_u16(),
            errors,
        }
    }
}

fn failure(errors: Vec<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(MutationFailureBody::new(errors))
}

/// Translate a pipeline outcome into a response.
fn respond(id: Option<UserId>, result: MutationResult) -> ApiResult<HttpResponse> {
    match result {
        MutationResult::Created(user) => Ok(HttpResponse::Created().json(UserPayload::from(&user))),
        MutationResult::Found(user) | MutationResult::Updated(user) => {
            Ok(HttpResponse::Ok().json(UserPayload::from(&user)))
        }
        MutationResult::Deleted => Ok(HttpResponse::NoContent().finish()),
        MutationResult::ValidationFailure(errors) | MutationResult::Conflict(errors) => {
            Ok(failure(errors))
        }
        MutationResult::NotFound => Err(match id {
            Some(id) => Error::not_found(format!("user {id} not found")),
            None => Error::not_found("user not found"),
        }),
    }
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body(content = UserFieldsSchema, content_type = "application/json"),
    responses(
        (status = 201, description = "User created", body = UserPayload),
        (status = 400, description = "Validation failure or email conflict", body = MutationFailureBody),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(state: web::Data<HttpState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let input = match parse_field_map(&body) {
        Ok(input) => input,
        Err(message) => return Ok(failure(vec![message.to_owned()])),
    };
    let result = state.users.create(&input).await?;
    respond(None, result)
}

/// Fetch a user by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserPayload),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let result = state.users_query.fetch(id).await?;
    respond(Some(id), result)
}

/// Partially update a user.
///
/// Only supplied, non-blank fields replace stored values.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    request_body(content = UserFieldsSchema, content_type = "application/json"),
    responses(
        (status = 200, description = "User updated", body = UserPayload),
        (status = 400, description = "Validation failure or email conflict", body = MutationFailureBody),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let input = match parse_field_map(&body) {
        Ok(input) => input,
        Err(message) => return Ok(failure(vec![message.to_owned()])),
    };
    let result = state.users.update(id, &input).await?;
    respond(Some(id), result)
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    let result = state.users.delete(id).await?;
    respond(Some(id), result)
}

/// Register the user handlers on a scope or app.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use contacts_backend::inbound::http::users;
///
/// let app = App::new().service(web::scope("/api/v1").configure(users::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
