use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Value, json};
use userdeck::action::ActionPolicy;
use userdeck::{AppState, Method, Request, Response, Router, Store, routes};

fn app() -> Router<AppState> {
    routes(AppState::new(Store::new(), ActionPolicy::Strict))
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("response body is JSON")
}

fn new_user(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "address": {
            "street": "123 Main St",
            "city": "New York",
            "state": "NY",
            "postal_code": "10001",
            "country": "USA"
        },
        "contact": { "phone": "+1-555-123-4567" },
        "profile": { "skills": ["Go", "Rust"], "experience": 5 },
        "preferences": {
            "theme": "dark",
            "language": "en",
            "notifications": { "email": true, "push": true },
            "privacy": { "profile_visible": true }
        }
    })
}

async fn send(app: &Router<AppState>, method: Method, target: &str, body: Option<&Value>) -> Response {
    let mut req = Request::new(method, target);
    if let Some(body) = body {
        req = req
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_vec(body).unwrap());
    }
    app.dispatch(req).await
}

async fn create(app: &Router<AppState>, name: &str, email: &str) -> Value {
    let res = send(app, Method::Post, "/api/v1/users", Some(&new_user(name, email))).await;
    assert_eq!(res.status_code(), 201, "{}", String::from_utf8_lossy(res.body()));
    json_body(&res)
}

#[tokio::test]
async fn create_then_get_and_list() {
    let app = app();
    let created = create(&app, "John Doe", "john@example.com").await;
    let id = created["id"].as_u64().unwrap();

    let res = send(&app, Method::Get, &format!("/api/v1/users/{id}"), None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), created);

    let res = send(&app, Method::Get, "/api/v1/users", None).await;
    let listed = json_body(&res);
    let matches = listed.as_array().unwrap().iter().filter(|u| u["id"] == id).count();
    assert_eq!(matches, 1);
}

#[tokio::test]
async fn create_sets_location_header() {
    let app = app();
    let res = send(&app, Method::Post, "/api/v1/users", Some(&new_user("Ada", "ada@example.com"))).await;
    assert_eq!(res.header("location"), Some("/api/v1/users/1"));
}

#[tokio::test]
async fn invalid_create_is_400_and_stores_nothing() {
    let app = app();
    let mut missing_email = new_user("Ada", "x@example.com");
    missing_email.as_object_mut().unwrap().remove("email");

    for body in [missing_email, new_user("Ada", "not-an-email"), new_user("", "ada@example.com")] {
        let res = send(&app, Method::Post, "/api/v1/users", Some(&body)).await;
        assert_eq!(res.status_code(), 400);
        assert!(json_body(&res)["error"].is_string());
    }

    let res = app.dispatch(Request::new(Method::Post, "/api/v1/users").with_body(b"{oops".to_vec())).await;
    assert_eq!(res.status_code(), 400);

    assert!(app.state().store.is_empty());
    let res = send(&app, Method::Get, "/api/v1/users", None).await;
    assert_eq!(json_body(&res), json!([]));
}

#[tokio::test]
async fn create_treats_null_sections_and_fields_as_empty() {
    let app = app();
    let body = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "address": { "city": "London", "country": null },
        "contact": null,
        "profile": { "skills": null, "experience": null },
        "preferences": { "theme": "light", "notifications": null }
    });
    let res = send(&app, Method::Post, "/api/v1/users", Some(&body)).await;
    assert_eq!(res.status_code(), 201, "{}", String::from_utf8_lossy(res.body()));

    let user = json_body(&res);
    assert_eq!(user["address"]["country"], "");
    assert_eq!(user["contact"], json!({ "phone": "" }));
    assert_eq!(user["profile"], json!({ "experience": 0 }));
    assert_eq!(user["preferences"]["theme"], "light");
    assert_eq!(user["preferences"]["notifications"]["email"], false);
}

#[tokio::test]
async fn malformed_or_unknown_ids() {
    let app = app();
    for target in ["/api/v1/users/abc", "/api/v1/users/0", "/api/v1/users/-3"] {
        let res = send(&app, Method::Get, target, None).await;
        assert_eq!(res.status_code(), 400, "{target}");
    }
    let res = send(&app, Method::Get, "/api/v1/users/77", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res), json!({ "error": "user 77 not found" }));
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let app = app();
    let before = create(&app, "John Doe", "john@example.com").await;

    let res = send(&app, Method::Put, "/api/v1/users/1", Some(&json!({ "name": "X" }))).await;
    assert_eq!(res.status_code(), 200);
    let mut after = json_body(&res);
    assert_eq!(after["name"], "X");

    after["name"] = before["name"].clone();
    after["updated_at"] = before["updated_at"].clone();
    assert_eq!(after, before);
}

#[tokio::test]
async fn update_replaces_nested_objects_and_validates() {
    let app = app();
    create(&app, "John Doe", "john@example.com").await;

    let patch = json!({ "address": { "city": "Boston" }, "contact": null });
    let res = send(&app, Method::Put, "/api/v1/users/1", Some(&patch)).await;
    let user = json_body(&res);
    assert_eq!(user["address"], json!({
        "street": "", "city": "Boston", "state": "", "postal_code": "", "country": ""
    }));
    assert_eq!(user["contact"], json!({ "phone": "" }));

    let res = send(&app, Method::Put, "/api/v1/users/1", Some(&json!({ "email": "broken" }))).await;
    assert_eq!(res.status_code(), 400);
    let res = send(&app, Method::Put, "/api/v1/users/9", Some(&json!({ "name": "Y" }))).await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn update_of_unknown_user_is_404_before_validation() {
    let app = app();
    create(&app, "Ada", "ada@example.com").await;

    let res = send(&app, Method::Put, "/api/v1/users/999", Some(&json!({ "email": "bad" }))).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res), json!({ "error": "user 999 not found" }));

    let res = send(&app, Method::Put, "/api/v1/user-action?action=update&id=999", Some(&json!({ "name": null }))).await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn delete_then_get_is_404_and_id_is_not_reused() {
    let app = app();
    create(&app, "Ada", "ada@example.com").await;

    let res = send(&app, Method::Delete, "/api/v1/users/1", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), json!({ "message": "User deleted successfully" }));

    let res = send(&app, Method::Get, "/api/v1/users/1", None).await;
    assert_eq!(res.status_code(), 404);
    let res = send(&app, Method::Delete, "/api/v1/users/1", None).await;
    assert_eq!(res.status_code(), 404);

    let next = create(&app, "Bob", "bob@example.com").await;
    assert_eq!(next["id"], 2);
}

#[tokio::test]
async fn nested_sections_get_and_replace() {
    let app = app();
    create(&app, "Ada", "ada@example.com").await;

    let res = send(&app, Method::Get, "/api/v1/users/1/address", None).await;
    assert_eq!(json_body(&res)["city"], "New York");

    let profile = json!({ "bio": "Engineer", "skills": ["Rust"], "experience": 9 });
    let res = send(&app, Method::Put, "/api/v1/users/1/profile", Some(&profile)).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), json!({ "bio": "Engineer", "skills": ["Rust"], "experience": 9 }));

    let prefs = json!({ "theme": "light", "language": "fr" });
    send(&app, Method::Put, "/api/v1/users/1/preferences", Some(&prefs)).await;
    let user = json_body(&send(&app, Method::Get, "/api/v1/users/1", None).await);
    assert_eq!(user["preferences"]["theme"], "light");
    assert_eq!(user["preferences"]["notifications"]["email"], false);
    assert_eq!(user["profile"]["bio"], "Engineer");
    assert_eq!(user["address"]["city"], "New York");

    let res = send(&app, Method::Put, "/api/v1/users/1/address", None).await;
    assert_eq!(res.status_code(), 400);
    let res = send(&app, Method::Get, "/api/v1/users/5/preferences", None).await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn action_get_matches_resource_get() {
    let app = app();
    create(&app, "Ada", "ada@example.com").await;

    let resource = send(&app, Method::Get, "/api/v1/users/1", None).await;
    let action = send(&app, Method::Get, "/api/v1/user-action?action=get&id=1", None).await;
    assert_eq!(action.status_code(), 200);
    assert_eq!(action.body(), resource.body());
}

#[tokio::test]
async fn action_bogus_fails_for_every_method() {
    let app = app();
    for method in [Method::Get, Method::Post, Method::Put, Method::Delete] {
        let res = send(&app, method, "/api/v1/user-action?action=bogus", None).await;
        assert_eq!(res.status_code(), 400, "{method}");
        assert_eq!(json_body(&res), json!({ "error": "unknown action: bogus" }));
    }
}

#[tokio::test]
async fn action_crud_round() {
    let app = app();
    let res = send(&app, Method::Post, "/api/v1/user-action?action=create", Some(&new_user("Ada", "ada@example.com"))).await;
    assert_eq!(res.status_code(), 201);

    let res = send(&app, Method::Put, "/api/v1/user-action?action=update&id=1", Some(&json!({ "name": "Grace" }))).await;
    assert_eq!(json_body(&res)["name"], "Grace");

    let res = send(&app, Method::Get, "/api/v1/user-action?action=list", None).await;
    assert_eq!(json_body(&res).as_array().unwrap().len(), 1);

    let res = send(&app, Method::Delete, "/api/v1/user-action?action=delete&id=1", None).await;
    assert_eq!(res.status_code(), 200);
    let res = send(&app, Method::Get, "/api/v1/user-action?action=get&id=1", None).await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn action_method_mismatch_is_rejected_when_strict() {
    let app = app();
    create(&app, "Ada", "ada@example.com").await;

    let res = send(&app, Method::Get, "/api/v1/user-action?action=delete&id=1", None).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(app.state().store.len(), 1);
}

#[tokio::test]
async fn action_method_mismatch_runs_when_lenient() {
    let app = routes(AppState::new(Store::new(), ActionPolicy::Lenient));
    create(&app, "Ada", "ada@example.com").await;

    let res = send(&app, Method::Get, "/api/v1/user-action?action=delete&id=1", None).await;
    assert_eq!(res.status_code(), 200);
    assert!(app.state().store.is_empty());
}

#[tokio::test]
async fn xml_is_negotiated_with_parallel_names() {
    let app = app();
    create(&app, "Ada", "ada@example.com").await;

    let res = app.dispatch(
        Request::new(Method::Get, "/api/v1/users").with_header("Accept", "application/xml"),
    ).await;
    assert_eq!(res.header("content-type"), Some("application/xml"));
    let xml = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(xml.contains("<users><user><id>1</id><name>Ada</name><email>ada@example.com</email>"));
    assert!(xml.contains("<postal_code>10001</postal_code>"));

    let res = app.dispatch(
        Request::new(Method::Get, "/api/v1/users/8").with_header("accept", "text/xml"),
    ).await;
    assert_eq!(res.status_code(), 404);
    let xml = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(xml.ends_with("<response><error>user 8 not found</error></response>"));
}

#[tokio::test]
async fn health_returns_fixed_payload() {
    let app = app();
    let res = send(&app, Method::Get, "/api/v1/health", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), json!({ "message": "ok" }));

    let res = send(&app, Method::Get, "/readyz", None).await;
    assert_eq!(res.body(), b"ready");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_gapless_ids() {
    const CALLERS: u64 = 200;
    let app = Arc::new(app());

    let mut tasks = tokio::task::JoinSet::new();
    for n in 0..CALLERS {
        let app = Arc::clone(&app);
        tasks.spawn(async move {
            let body = new_user(&format!("user{n}"), &format!("user{n}@example.com"));
            let res = send(&app, Method::Post, "/api/v1/users", Some(&body)).await;
            assert_eq!(res.status_code(), 201);
            json_body(&res)["id"].as_u64().unwrap()
        });
    }

    let mut ids = HashSet::new();
    while let Some(id) = tasks.join_next().await {
        assert!(ids.insert(id.unwrap()), "duplicate id");
    }
    assert_eq!(ids, (1..=CALLERS).collect::<HashSet<_>>());

    let listed: Vec<u64> = app.state().store.list().iter().map(|u| u.id).collect();
    assert_eq!(listed, (1..=CALLERS).collect::<Vec<_>>());
}
