//! Error types.
//!
//! Two families:
//!
//! - [`ApiError`] is what a request can fail with. Every variant maps to one
//!   HTTP status and is rendered as an `{ "error": … }` body.
//! - [`Error`] surfaces infrastructure failures: binding to a port or
//!   accepting a connection. It never reaches a client.

use crate::status::Status;

/// A request-level failure. Terminal for the request: nothing is retried and
/// nothing is partially applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Malformed input, missing required field, bad email, unknown action.
    #[error("{0}")]
    Validation(String),

    /// No user with the requested identifier.
    #[error("{0}")]
    NotFound(String),

    /// Anything the client could not have caused.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn user_not_found(id: u64) -> Self {
        Self::NotFound(format!("user {id} not found"))
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::NotFound(_)   => Status::NotFound,
            Self::Internal(_)   => Status::InternalServerError,
        }
    }
}

/// The error type returned by the server's fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_variant_to_its_status() {
        assert_eq!(ApiError::validation("bad").status(), Status::BadRequest);
        assert_eq!(ApiError::user_not_found(7).status(), Status::NotFound);
        assert_eq!(ApiError::Internal("boom".into()).status(), Status::InternalServerError);
        assert_eq!(ApiError::user_not_found(7).to_string(), "user 7 not found");
    }
}
