//! Action-style dispatcher: `/api/v1/user-action?action=…&id=…`.
//!
//! The `action` parameter picks the operation. Each action also has the
//! method a resource route would use for it; what happens when the request
//! method disagrees is decided by [`ActionPolicy`].

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::handlers::format_of;
use crate::method::Method;
use crate::ops::{self, Operation, decode_body, parse_id};
use crate::request::Request;
use crate::response::Response;
use crate::routes::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List   => "list",
            Self::Get    => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// The method the equivalent resource route uses.
    pub fn expected_method(self) -> Method {
        match self {
            Self::List | Self::Get => Method::Get,
            Self::Create           => Method::Post,
            Self::Update           => Method::Put,
            Self::Delete           => Method::Delete,
        }
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list"   => Ok(Self::List),
            "get"    => Ok(Self::Get),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other    => Err(ApiError::validation(format!("unknown action: {other}"))),
        }
    }
}

/// How to treat a request whose method does not match its action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionPolicy {
    /// Reject the mismatch as a validation error.
    #[default]
    Strict,
    /// Log the mismatch and run the action anyway.
    Lenient,
}

#[derive(Debug, Default, Deserialize)]
struct ActionQuery {
    action: Option<String>,
    id: Option<String>,
}

/// Maps one action request onto an [`Operation`]. The action is checked
/// before the method, so an unknown action is always a validation error.
pub fn decode(req: &Request, policy: ActionPolicy) -> Result<Operation, ApiError> {
    let query: ActionQuery = req
        .query_as()
        .map_err(|e| ApiError::validation(format!("invalid query: {e}")))?;
    let action: Action = query
        .action
        .as_deref()
        .ok_or_else(|| ApiError::validation("unknown action: (missing)"))?
        .parse()?;

    let expected = action.expected_method();
    if req.method() != expected {
        match policy {
            ActionPolicy::Strict => {
                return Err(ApiError::validation(format!(
                    "action `{}` requires {expected}, got {}",
                    action.as_str(),
                    req.method(),
                )));
            }
            ActionPolicy::Lenient => warn!(
                action = action.as_str(),
                method = %req.method(),
                %expected,
                "action/method mismatch",
            ),
        }
    }

    let id = || parse_id(query.id.as_deref());
    Ok(match action {
        Action::List   => Operation::List,
        Action::Get    => Operation::Get(id()?),
        Action::Create => Operation::Create(decode_body(req.body())?),
        Action::Update => Operation::Update(id()?, decode_body(req.body())?),
        Action::Delete => Operation::Delete(id()?),
    })
}

// GET|POST|PUT|DELETE /api/v1/user-action
pub async fn user_action(state: Arc<AppState>, req: Request) -> Response {
    let op = decode(&req, state.action_policy);
    if let Ok(op) = &op {
        tracing::debug!(operation = op.name(), "user action");
    }
    ops::run(&state.store, format_of(&req), op)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(method: Method, target: &str) -> Request {
        Request::new(method, target)
    }

    #[test]
    fn maps_actions_to_operations() {
        let op = decode(&req(Method::Get, "/x?action=get&id=7"), ActionPolicy::Strict);
        assert_eq!(op, Ok(Operation::Get(7)));
        let op = decode(&req(Method::Get, "/x?action=list"), ActionPolicy::Strict);
        assert_eq!(op, Ok(Operation::List));
        let op = decode(&req(Method::Delete, "/x?action=delete&id=2"), ActionPolicy::Strict);
        assert_eq!(op, Ok(Operation::Delete(2)));
    }

    #[test]
    fn unknown_or_missing_action_fails_for_every_method() {
        for method in [Method::Get, Method::Post, Method::Put, Method::Delete] {
            for policy in [ActionPolicy::Strict, ActionPolicy::Lenient] {
                let err = decode(&req(method, "/x?action=bogus"), policy).unwrap_err();
                assert_eq!(err, ApiError::validation("unknown action: bogus"));
                assert!(decode(&req(method, "/x"), policy).is_err());
            }
        }
    }

    #[test]
    fn method_mismatch_depends_on_policy() {
        let strict = decode(&req(Method::Get, "/x?action=delete&id=1"), ActionPolicy::Strict);
        assert_eq!(
            strict,
            Err(ApiError::validation("action `delete` requires DELETE, got GET")),
        );
        let lenient = decode(&req(Method::Get, "/x?action=delete&id=1"), ActionPolicy::Lenient);
        assert_eq!(lenient, Ok(Operation::Delete(1)));
    }

    #[test]
    fn id_and_body_are_required_where_used() {
        assert!(decode(&req(Method::Get, "/x?action=get"), ActionPolicy::Strict).is_err());
        assert!(decode(&req(Method::Get, "/x?action=get&id=zero"), ActionPolicy::Strict).is_err());
        assert!(decode(&req(Method::Post, "/x?action=create"), ActionPolicy::Strict).is_err());

        let update = req(Method::Put, "/x?action=update&id=3").with_body(br#"{"name":"X"}"#.to_vec());
        let Ok(Operation::Update(3, patch)) = decode(&update, ActionPolicy::Strict) else {
            panic!("expected update");
        };
        assert!(!patch.is_empty());
    }
}
