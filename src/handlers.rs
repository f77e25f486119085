//! Resource-style handlers: one route, one operation.

use std::sync::Arc;

use crate::error::ApiError;
use crate::model::{Nested, Section};
use crate::ops::{self, Operation, decode_body, parse_id};
use crate::render::Format;
use crate::request::Request;
use crate::response::Response;
use crate::routes::AppState;

pub(crate) fn format_of(req: &Request) -> Format {
    Format::negotiate(req.header("accept"))
}

// GET /api/v1/users
pub async fn list_users(state: Arc<AppState>, req: Request) -> Response {
    ops::run(&state.store, format_of(&req), Ok(Operation::List))
}

// GET /api/v1/users/{id}
pub async fn get_user(state: Arc<AppState>, req: Request) -> Response {
    let op = parse_id(req.param("id")).map(Operation::Get);
    ops::run(&state.store, format_of(&req), op)
}

// POST /api/v1/users → 201 with location
pub async fn create_user(state: Arc<AppState>, req: Request) -> Response {
    let op = decode_body(req.body()).map(Operation::Create);
    ops::run(&state.store, format_of(&req), op)
}

// PUT /api/v1/users/{id}, partial body
pub async fn update_user(state: Arc<AppState>, req: Request) -> Response {
    let op = parse_id(req.param("id"))
        .and_then(|id| Ok(Operation::Update(id, decode_body(req.body())?)));
    ops::run(&state.store, format_of(&req), op)
}

// DELETE /api/v1/users/{id}
pub async fn delete_user(state: Arc<AppState>, req: Request) -> Response {
    let op = parse_id(req.param("id")).map(Operation::Delete);
    ops::run(&state.store, format_of(&req), op)
}

fn get_section(state: &AppState, req: &Request, section: Section) -> Response {
    let op = parse_id(req.param("id")).map(|id| Operation::GetNested(id, section));
    ops::run(&state.store, format_of(req), op)
}

fn replace_section(state: &AppState, req: &Request, section: Section) -> Response {
    let op = parse_id(req.param("id")).and_then(|id| {
        if req.body().is_empty() {
            return Err(ApiError::validation("request body is required"));
        }
        let value = Nested::from_json(section, req.body()).map_err(|e| {
            ApiError::validation(format!("invalid {} body: {e}", section.as_str()))
        })?;
        Ok(Operation::ReplaceNested(id, value))
    });
    ops::run(&state.store, format_of(req), op)
}

pub async fn get_address(state: Arc<AppState>, req: Request) -> Response {
    get_section(&state, &req, Section::Address)
}

pub async fn update_address(state: Arc<AppState>, req: Request) -> Response {
    replace_section(&state, &req, Section::Address)
}

pub async fn get_profile(state: Arc<AppState>, req: Request) -> Response {
    get_section(&state, &req, Section::Profile)
}

pub async fn update_profile(state: Arc<AppState>, req: Request) -> Response {
    replace_section(&state, &req, Section::Profile)
}

pub async fn get_preferences(state: Arc<AppState>, req: Request) -> Response {
    get_section(&state, &req, Section::Preferences)
}

pub async fn update_preferences(state: Arc<AppState>, req: Request) -> Response {
    replace_section(&state, &req, Section::Preferences)
}
