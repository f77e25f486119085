//! The one set of user operations behind both request styles.
//!
//! [`handlers`](crate::handlers) and [`action`](crate::action) only decode
//! requests into an [`Operation`] and render the [`Outcome`]; neither talks
//! to the store directly.

use crate::error::ApiError;
use crate::model::{CreateUserRequest, Nested, Section, UpdateUserRequest, User};
use crate::render::{self, Format, Message};
use crate::response::Response;
use crate::status::Status;
use crate::store::Store;

/// Base path of the user collection, used for `location` headers.
pub const USERS_PATH: &str = "/api/v1/users";

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    List,
    Get(u64),
    Create(CreateUserRequest),
    Update(u64, UpdateUserRequest),
    Delete(u64),
    GetNested(u64, Section),
    ReplaceNested(u64, Nested),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List             => "list",
            Self::Get(_)           => "get",
            Self::Create(_)        => "create",
            Self::Update(..)       => "update",
            Self::Delete(_)        => "delete",
            Self::GetNested(..)    => "get_nested",
            Self::ReplaceNested(..) => "replace_nested",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Users(Vec<User>),
    User(User),
    Created(User),
    Deleted(User),
    Nested(Nested),
}

impl Outcome {
    pub fn render(&self, format: Format) -> Response {
        match self {
            Self::Users(users) => render::respond(format, Status::Ok, users),
            Self::User(user) => render::respond(format, Status::Ok, user),
            Self::Created(user) => render::respond(format, Status::Created, user)
                .with_header("location", &format!("{USERS_PATH}/{}", user.id)),
            Self::Deleted(_) => render::respond(
                format,
                Status::Ok,
                &Message("User deleted successfully".to_owned()),
            ),
            Self::Nested(nested) => render::respond(format, Status::Ok, nested),
        }
    }
}

pub fn execute(store: &Store, op: Operation) -> Result<Outcome, ApiError> {
    Ok(match op {
        Operation::List                   => Outcome::Users(store.list()),
        Operation::Get(id)                => Outcome::User(store.get(id)?),
        Operation::Create(req)            => Outcome::Created(store.create(req)?),
        Operation::Update(id, patch)      => Outcome::User(store.update(id, patch)?),
        Operation::Delete(id)             => Outcome::Deleted(store.delete(id)?),
        Operation::GetNested(id, section) => Outcome::Nested(store.nested(id, section)?),
        Operation::ReplaceNested(id, v)   => Outcome::Nested(store.replace_nested(id, v)?),
    })
}

/// Runs `op` (or the decode error that stood in for it) and renders the
/// result in one response.
pub fn run(store: &Store, format: Format, op: Result<Operation, ApiError>) -> Response {
    match op.and_then(|op| execute(store, op)) {
        Ok(outcome) => outcome.render(format),
        Err(err) => {
            tracing::debug!(error = %err, "request rejected");
            render::error(format, &err)
        }
    }
}

// ── Shared decoding ──────────────────────────────────────────────────────────

/// Parses a user identifier. Only positive integers are valid.
pub fn parse_id(raw: Option<&str>) -> Result<u64, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::validation("user id is required"))?;
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation(format!("invalid user id: {raw}"))),
    }
}

/// Decodes a JSON request body. Empty and malformed bodies are validation
/// errors.
pub fn decode_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::validation("request body is required"));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("invalid request body: {e}")))
}
