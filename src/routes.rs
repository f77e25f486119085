//! Route table and the application state every handler receives.

use crate::action::{self, ActionPolicy};
use crate::docs;
use crate::handlers;
use crate::health;
use crate::method::Method;
use crate::router::Router;
use crate::store::Store;

/// Shared by all handlers through the router. Built once in `main` (or a
/// test) and never global.
#[derive(Debug, Default)]
pub struct AppState {
    pub store: Store,
    pub action_policy: ActionPolicy,
}

impl AppState {
    pub fn new(store: Store, action_policy: ActionPolicy) -> Self {
        Self { store, action_policy }
    }
}

/// Binds every path and method to its handler.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new(state)
        .on(Method::Get,    "/api/v1/users",                  handlers::list_users)
        .on(Method::Post,   "/api/v1/users",                  handlers::create_user)
        .on(Method::Get,    "/api/v1/users/{id}",             handlers::get_user)
        .on(Method::Put,    "/api/v1/users/{id}",             handlers::update_user)
        .on(Method::Delete, "/api/v1/users/{id}",             handlers::delete_user)
        .on(Method::Get,    "/api/v1/users/{id}/address",     handlers::get_address)
        .on(Method::Put,    "/api/v1/users/{id}/address",     handlers::update_address)
        .on(Method::Get,    "/api/v1/users/{id}/profile",     handlers::get_profile)
        .on(Method::Put,    "/api/v1/users/{id}/profile",     handlers::update_profile)
        .on(Method::Get,    "/api/v1/users/{id}/preferences", handlers::get_preferences)
        .on(Method::Put,    "/api/v1/users/{id}/preferences", handlers::update_preferences)
        .on(Method::Get,    "/api/v1/user-action",            action::user_action)
        .on(Method::Post,   "/api/v1/user-action",            action::user_action)
        .on(Method::Put,    "/api/v1/user-action",            action::user_action)
        .on(Method::Delete, "/api/v1/user-action",            action::user_action)
        .on(Method::Get,    "/api/v1/health",                 health::liveness)
        .on(Method::Get,    "/readyz",                        health::readiness)
        .on(Method::Get,    "/swagger",                       docs::swagger_root)
        .on(Method::Get,    "/swagger/{*file}",               docs::swagger_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    #[tokio::test]
    async fn every_documented_endpoint_is_routed() {
        let app = routes(AppState::default());
        for endpoint in docs::ENDPOINTS {
            let path = format!("{}{}", docs::BASE_PATH, endpoint.path.replace("{id}", "1"));
            assert!(
                app.lookup(endpoint.method, &path).is_some(),
                "{} {path} is documented but not routed", endpoint.method,
            );
        }
    }

    #[tokio::test]
    async fn swagger_serves_document_and_page() {
        let app = routes(AppState::default());
        let res = app.dispatch(Request::new(Method::Get, "/swagger/doc.json")).await;
        assert_eq!(res.status_code(), 200);
        let doc: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(doc["swagger"], "2.0");

        let res = app.dispatch(Request::new(Method::Get, "/swagger/index.html")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        let page = std::str::from_utf8(res.body()).unwrap();
        assert!(page.contains("SwaggerUIBundle"));
        assert!(page.contains(r##"dom_id: "#swagger-ui""##));

        let res = app.dispatch(Request::new(Method::Get, "/swagger")).await;
        assert_eq!(res.status_code(), 308);
        assert_eq!(res.header("location"), Some("/swagger/index.html"));

        let res = app.dispatch(Request::new(Method::Get, "/swagger/missing.css")).await;
        assert_eq!(res.status_code(), 404);
    }
}
