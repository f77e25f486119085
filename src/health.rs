//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/api/v1/health` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |

use std::sync::Arc;

use crate::render::{self, Message};
use crate::request::Request;
use crate::response::Response;
use crate::routes::AppState;
use crate::status::Status;

/// Always `200 OK` with `{ "message": "ok" }`, negotiated like any other
/// body. If the process can respond at all, it is alive.
pub async fn liveness(_state: Arc<AppState>, req: Request) -> Response {
    let format = render::Format::negotiate(req.header("accept"));
    render::respond(format, Status::Ok, &Message("ok".to_owned()))
}

/// Plain-text `ready`. The store lives in memory, so there is nothing to
/// wait for once the router exists.
pub async fn readiness(_state: Arc<AppState>, _req: Request) -> Response {
    Response::text("ready")
}
