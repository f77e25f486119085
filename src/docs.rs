//! Machine-readable API description (Swagger 2.0) and a Swagger UI page.
//!
//! `GET /swagger/doc.json` serves [`document`]; `GET /swagger/index.html`
//! serves a page that loads Swagger UI from a CDN and points it at the
//! document. The document is assembled by hand from [`ENDPOINTS`], so a
//! route added to the router must be added here as well; the route-table
//! tests check that both agree.

use std::sync::{Arc, LazyLock};

use serde_json::{Map, Value, json};

use crate::method::Method;
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::routes::AppState;
use crate::status::Status;

pub const BASE_PATH: &str = "/api/v1";

/// One documented operation. `path` is relative to [`BASE_PATH`].
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    pub summary: &'static str,
    pub tag: &'static str,
    /// Definition name of the JSON body, if any.
    pub body: Option<&'static str>,
    /// Success status and the definition it returns.
    pub ok: (u16, Schema),
}

#[derive(Debug, Clone, Copy)]
pub enum Schema {
    Ref(&'static str),
    ArrayOf(&'static str),
}

const fn ep(
    method: Method,
    path: &'static str,
    summary: &'static str,
    tag: &'static str,
    body: Option<&'static str>,
    ok: (u16, Schema),
) -> Endpoint {
    Endpoint { method, path, summary, tag, body, ok }
}

pub const ENDPOINTS: &[Endpoint] = &[
    ep(Method::Get,    "/users",                  "List users",               "users",  None,                      (200, Schema::ArrayOf("User"))),
    ep(Method::Post,   "/users",                  "Create a user",            "users",  Some("CreateUserRequest"), (201, Schema::Ref("User"))),
    ep(Method::Get,    "/users/{id}",             "Get a user",               "users",  None,                      (200, Schema::Ref("User"))),
    ep(Method::Put,    "/users/{id}",             "Partially update a user",  "users",  Some("UpdateUserRequest"), (200, Schema::Ref("User"))),
    ep(Method::Delete, "/users/{id}",             "Delete a user",            "users",  None,                      (200, Schema::Ref("SuccessResponse"))),
    ep(Method::Get,    "/users/{id}/address",     "Get a user's address",     "nested", None,                      (200, Schema::Ref("Address"))),
    ep(Method::Put,    "/users/{id}/address",     "Replace a user's address", "nested", Some("Address"),           (200, Schema::Ref("Address"))),
    ep(Method::Get,    "/users/{id}/profile",     "Get a user's profile",     "nested", None,                      (200, Schema::Ref("Profile"))),
    ep(Method::Put,    "/users/{id}/profile",     "Replace a user's profile", "nested", Some("Profile"),           (200, Schema::Ref("Profile"))),
    ep(Method::Get,    "/users/{id}/preferences", "Get a user's preferences", "nested", None,                      (200, Schema::Ref("Preferences"))),
    ep(Method::Put,    "/users/{id}/preferences", "Replace a user's preferences", "nested", Some("Preferences"),   (200, Schema::Ref("Preferences"))),
    ep(Method::Get,    "/user-action",            "Run action list or get",   "actions", None,                     (200, Schema::Ref("User"))),
    ep(Method::Post,   "/user-action",            "Run action create",        "actions", Some("CreateUserRequest"), (201, Schema::Ref("User"))),
    ep(Method::Put,    "/user-action",            "Run action update",        "actions", Some("UpdateUserRequest"), (200, Schema::Ref("User"))),
    ep(Method::Delete, "/user-action",            "Run action delete",        "actions", None,                     (200, Schema::Ref("SuccessResponse"))),
    ep(Method::Get,    "/health",                 "Liveness probe",           "health", None,                      (200, Schema::Ref("SuccessResponse"))),
];

static DOCUMENT: LazyLock<Vec<u8>> = LazyLock::new(|| {
    serde_json::to_vec_pretty(&document()).unwrap_or_default()
});

/// Builds the Swagger 2.0 document for every entry in [`ENDPOINTS`].
pub fn document() -> Value {
    let mut paths = Map::new();
    for endpoint in ENDPOINTS {
        let item = paths
            .entry(endpoint.path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(item) = item {
            item.insert(endpoint.method.as_str().to_ascii_lowercase(), operation(endpoint));
        }
    }

    json!({
        "swagger": "2.0",
        "info": {
            "title": "userdeck",
            "description": "In-memory user records with nested address, contact, profile and preferences.",
            "version": env!("CARGO_PKG_VERSION"),
            "license": { "name": "MIT" },
        },
        "basePath": BASE_PATH,
        "schemes": ["http"],
        "consumes": ["application/json"],
        "produces": ["application/json", "application/xml"],
        "paths": paths,
        "definitions": definitions(),
    })
}

fn operation(endpoint: &Endpoint) -> Value {
    let mut parameters = Vec::new();
    if endpoint.path.contains("{id}") {
        parameters.push(json!({
            "name": "id", "in": "path", "required": true,
            "type": "integer", "minimum": 1,
        }));
    }
    if endpoint.path == "/user-action" {
        parameters.push(json!({
            "name": "action", "in": "query", "required": true, "type": "string",
            "enum": ["list", "get", "create", "update", "delete"],
        }));
        parameters.push(json!({
            "name": "id", "in": "query", "required": false, "type": "integer",
        }));
    }
    if let Some(body) = endpoint.body {
        parameters.push(json!({
            "name": "body", "in": "body", "required": true, "schema": reference(body),
        }));
    }

    let (ok_code, ok_schema) = endpoint.ok;
    let ok_schema = match ok_schema {
        Schema::Ref(name) => reference(name),
        Schema::ArrayOf(name) => json!({ "type": "array", "items": reference(name) }),
    };
    let mut responses = Map::new();
    responses.insert(ok_code.to_string(), json!({ "description": "success", "schema": ok_schema }));
    if !parameters.is_empty() {
        responses.insert("400".into(), json!({ "description": "validation failed", "schema": reference("ErrorResponse") }));
    }
    if endpoint.path.contains("{id}") || endpoint.path == "/user-action" {
        responses.insert("404".into(), json!({ "description": "user not found", "schema": reference("ErrorResponse") }));
    }

    json!({
        "summary": endpoint.summary,
        "tags": [endpoint.tag],
        "parameters": parameters,
        "responses": responses,
    })
}

fn reference(name: &str) -> Value {
    json!({ "$ref": format!("#/definitions/{name}") })
}

fn string() -> Value { json!({ "type": "string" }) }
fn boolean() -> Value { json!({ "type": "boolean" }) }

fn definitions() -> Value {
    json!({
        "Address": {
            "type": "object",
            "properties": {
                "street": string(), "city": string(), "state": string(),
                "postal_code": string(), "country": string(),
            },
        },
        "ContactInfo": {
            "type": "object",
            "properties": {
                "phone": string(), "alternate_email": string(), "website": string(),
            },
        },
        "Profile": {
            "type": "object",
            "properties": {
                "bio": string(), "avatar": string(),
                "skills": { "type": "array", "items": string() },
                "experience": { "type": "integer" },
            },
        },
        "NotificationSettings": {
            "type": "object",
            "properties": {
                "email": boolean(), "sms": boolean(), "push": boolean(), "marketing": boolean(),
            },
        },
        "PrivacySettings": {
            "type": "object",
            "properties": {
                "profile_visible": boolean(), "show_email": boolean(), "show_phone": boolean(),
            },
        },
        "Preferences": {
            "type": "object",
            "properties": {
                "theme": string(), "language": string(),
                "notifications": reference("NotificationSettings"),
                "privacy": reference("PrivacySettings"),
            },
        },
        "User": {
            "type": "object",
            "properties": {
                "id": { "type": "integer" },
                "name": string(), "email": string(),
                "address": reference("Address"),
                "contact": reference("ContactInfo"),
                "profile": reference("Profile"),
                "preferences": reference("Preferences"),
                "created_at": { "type": "string", "format": "date-time" },
                "updated_at": { "type": "string", "format": "date-time" },
            },
        },
        "CreateUserRequest": {
            "type": "object",
            "required": ["name", "email", "address"],
            "properties": {
                "name": string(),
                "email": { "type": "string", "format": "email" },
                "address": reference("Address"),
                "contact": reference("ContactInfo"),
                "profile": reference("Profile"),
                "preferences": reference("Preferences"),
            },
        },
        "UpdateUserRequest": {
            "type": "object",
            "properties": {
                "name": string(),
                "email": { "type": "string", "format": "email" },
                "address": reference("Address"),
                "contact": reference("ContactInfo"),
                "profile": reference("Profile"),
                "preferences": reference("Preferences"),
            },
        },
        "ErrorResponse": { "type": "object", "properties": { "error": string() } },
        "SuccessResponse": { "type": "object", "properties": { "message": string() } },
    })
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>userdeck API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/swagger/doc.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

// GET /swagger → /swagger/index.html
pub async fn swagger_root(_state: Arc<AppState>, _req: Request) -> Response {
    Response::builder()
        .status(Status::PermanentRedirect)
        .header("location", "/swagger/index.html")
        .no_body()
}

// GET /swagger/{*file}
pub async fn swagger_file(_state: Arc<AppState>, req: Request) -> Response {
    match req.param("file") {
        Some("doc.json") => Response::json(DOCUMENT.clone()),
        Some("index.html") => Response::builder().bytes(ContentType::Html, INDEX_HTML.as_bytes().to_vec()),
        _ => Response::status(Status::NotFound),
    }
}
