// End-to-end API tests against the in-memory backend.
//
// Every request goes through the full router, so these cover the page guard,
// the bearer/cookie authentication, and the ownership-scoped storage together.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use studyhub_server::{auth::AuthConfig, router, storage::StorageBackend, AppState};

fn test_app() -> Router {
    let config = AuthConfig {
        token_secret: "integration-test-secret".to_string(),
        generated_secret: false,
        ..Default::default()
    };
    let state = AppState::new(Arc::new(StorageBackend::in_memory()), config);
    router(state)
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Sign up an account and return its session token.
async fn signup(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/v1/auth/signup",
            None,
            &json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

// ============================================
// Auth flow
// ============================================

#[tokio::test]
async fn test_signup_returns_token_and_cookie() {
    let app = test_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/signup",
            None,
            &json!({ "email": "Ada@Example.COM", "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));

    let body = body_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    // Email is stored case-folded; the default name comes from the local part.
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["name"], "ada");
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = test_app();
    signup(&app, "ada@example.com", "hunter22").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/signup",
            None,
            &json!({ "email": "ADA@example.com", "password": "other-password" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "email is already registered");
}

#[tokio::test]
async fn test_signup_requires_email_and_password() {
    let app = test_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/signup",
            None,
            &json!({ "email": "ada@example.com", "password": "" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_absent_required_fields_are_bad_request() {
    let app = test_app();

    // A field missing from the body entirely reads the same as an empty one.
    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/signup",
            None,
            &json!({ "email": "ada@example.com" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "email and password are required");

    let response = send(
        &app,
        json_request("POST", "/v1/auth/login", None, &json!({ "password": "pw" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = test_app();
    signup(&app, "ada@example.com", "hunter22").await;

    // Case-folded email matches the stored account.
    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            &json!({ "email": "Ada@Example.com", "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = test_app();
    signup(&app, "ada@example.com", "hunter22").await;

    // Wrong password and unknown email must be indistinguishable.
    let wrong_password = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            &json!({ "email": "ada@example.com", "password": "not-it" }),
        ),
    )
    .await;
    let unknown_email = send(
        &app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            &json!({ "email": "nobody@example.com", "password": "hunter22" }),
        ),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a["error"], "invalid email or password");
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = test_app();
    let token = signup(&app, "ada@example.com", "hunter22").await;

    let response = send(&app, get_request("/v1/auth/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "ada@example.com");

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/v1/auth/logout")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_missing_or_garbage_token_is_unauthorized() {
    let app = test_app();

    let missing = send(&app, get_request("/v1/tasks", None)).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = send(&app, get_request("/v1/tasks", Some("not-a-real-token"))).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_authenticates_api_requests() {
    let app = test_app();
    let token = signup(&app, "ada@example.com", "hunter22").await;

    let response = send(
        &app,
        Request::builder()
            .uri("/v1/tasks")
            .header(header::COOKIE, format!("token={token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================
// Page guard
// ============================================

#[tokio::test]
async fn test_guard_redirects_through_full_router() {
    let app = test_app();

    let response = send(&app, get_request("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/auth");

    let response = send(
        &app,
        Request::builder()
            .uri("/")
            .header(header::COOKIE, "token=anything")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

// ============================================
// Resource CRUD
// ============================================

#[tokio::test]
async fn test_task_lifecycle() {
    let app = test_app();
    let token = signup(&app, "ada@example.com", "hunter22").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/tasks",
            Some(&token),
            &json!({ "title": "Read chapter 4", "priority": "high" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["priority"], "high");
    assert_eq!(task["completed"], false);

    let response = send(&app, get_request("/v1/tasks", Some(&token))).await;
    let list = body_json(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/v1/tasks/{task_id}"),
            Some(&token),
            &json!({ "completed": true }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["completed"], true);
    // Untouched fields survive a partial update.
    assert_eq!(updated["title"], "Read chapter 4");

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/tasks/{task_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get_request(&format!("/v1/tasks/{task_id}"), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_task_requires_title() {
    let app = test_app();
    let token = signup(&app, "ada@example.com", "hunter22").await;

    let response = send(
        &app,
        json_request("POST", "/v1/tasks", Some(&token), &json!({ "title": "  " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = test_app();
    let token = signup(&app, "ada@example.com", "hunter22").await;

    for title in ["first", "second", "third"] {
        let response = send(
            &app,
            json_request("POST", "/v1/notes", Some(&token), &json!({ "title": title })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, get_request("/v1/notes", Some(&token))).await;
    let list = body_json(response).await;
    let titles: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

// ============================================
// Ownership isolation
// ============================================

#[tokio::test]
async fn test_accounts_cannot_touch_each_others_rows() {
    let app = test_app();
    let ada = signup(&app, "ada@example.com", "hunter22").await;
    let bob = signup(&app, "bob@example.com", "hunter22").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/assignments",
            Some(&ada),
            &json!({ "title": "Essay", "subject": "History" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let assignment = body_json(response).await;
    let id = assignment["id"].as_str().unwrap().to_string();

    // Bob sees nothing in his list.
    let response = send(&app, get_request("/v1/assignments", Some(&bob))).await;
    let list = body_json(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);

    // Bob's get, update and delete of Ada's row all read as plain 404s.
    let response = send(&app, get_request(&format!("/v1/assignments/{id}"), Some(&bob))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/v1/assignments/{id}"),
            Some(&bob),
            &json!({ "status": "graded" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/assignments/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {bob}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Ada's row is untouched.
    let response = send(&app, get_request(&format!("/v1/assignments/{id}"), Some(&ada))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let row = body_json(response).await;
    assert_eq!(row["status"], "pending");
}

#[tokio::test]
async fn test_subject_crud_is_scoped() {
    let app = test_app();
    let ada = signup(&app, "ada@example.com", "hunter22").await;
    let bob = signup(&app, "bob@example.com", "hunter22").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/v1/subjects",
            Some(&ada),
            &json!({ "name": "Linear Algebra", "teacher": "Dr. Chen", "credits": 5 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let subject = body_json(response).await;
    assert_eq!(subject["credits"], 5);

    let response = send(&app, get_request("/v1/subjects", Some(&ada))).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = send(&app, get_request("/v1/subjects", Some(&bob))).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_health_reports_in_memory_storage() {
    let app = test_app();

    let response = send(&app, get_request("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}
