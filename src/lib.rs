//! # userdeck
//!
//! In-memory user records over HTTP. Each user owns an address, contact
//! info, a profile and preferences; all of it lives in one [`Store`] behind
//! a mutex and disappears with the process.
//!
//! ## Two ways in
//!
//! - **Resource routes**: `GET/POST /api/v1/users`,
//!   `GET/PUT/DELETE /api/v1/users/{id}`, and
//!   `GET/PUT /api/v1/users/{id}/{address,profile,preferences}`.
//! - **Action route**: `/api/v1/user-action?action=list|get|create|update|delete&id=…`.
//!
//! Both decode into the same [`ops::Operation`] and render the same way, so a
//! user fetched either way produces identical bytes.
//!
//! ## Representation
//!
//! Responses are JSON unless `Accept` prefers `application/xml` or
//! `text/xml`. Errors are `{ "error": … }`, bodiless successes are
//! `{ "message": … }`. Request bodies are JSON.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use userdeck::{AppState, Server, Store, routes};
//! use userdeck::action::ActionPolicy;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = routes(AppState::new(Store::new(), ActionPolicy::Strict));
//!     Server::bind("0.0.0.0:8080".parse().unwrap()).serve(app).await.unwrap();
//! }
//! ```
//!
//! TLS, rate limiting and body-size limits belong to the reverse proxy in
//! front of the service.

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod action;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod health;
pub mod model;
pub mod ops;
pub mod render;
pub mod routes;
pub mod store;

pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use routes::{AppState, routes};
pub use server::{Server, serve_until};
pub use status::Status;
pub use store::Store;
