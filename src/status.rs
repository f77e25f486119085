//! HTTP status codes the service answers with, as a typed enum.
//!
//! ```rust
//! use userdeck::{ContentType, Response, Status};
//!
//! Response::builder()
//!     .status(Status::Created)
//!     .header("location", "/api/v1/users/42")
//!     .bytes(ContentType::Json, br#"{"id":42}"#.to_vec());
//! ```

/// Status codes used by the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    Created,             // 201

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    PermanentRedirect,   // 308

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    NotFound,            // 404
    MethodNotAllowed,    // 405

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::Created             => 201,
            Status::PermanentRedirect   => 308,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::InternalServerError => 500,
        }
    }
}
