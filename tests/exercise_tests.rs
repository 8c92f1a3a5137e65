//! Exercise tracker API tests

use std::sync::Arc;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use microapis::config::StaticConfig;
use microapis::runtime::AppState;
use microapis::services::StaticResolver;

fn test_state() -> AppState {
    AppState::with_resolver(
        Arc::new(StaticConfig::default()),
        Arc::new(StaticResolver::accept_all()),
    )
}

macro_rules! init_app {
    () => {{
        let state = test_state();
        test::init_service(App::new().configure(|cfg| state.configure(cfg))).await
    }};
}

macro_rules! create_user {
    ($app:expr, $name:expr) => {{
        let req = TestRequest::post()
            .uri("/api/users")
            .set_form([("username", $name)])
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["_id"].as_str().expect("user id").to_string()
    }};
}

macro_rules! add_exercise {
    ($app:expr, $id:expr, $desc:expr, $duration:expr, $date:expr) => {{
        let req = TestRequest::post()
            .uri(&format!("/api/users/{}/exercises", $id))
            .set_form([
                ("description", $desc),
                ("duration", $duration),
                ("date", $date),
            ])
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_rt::test]
async fn test_create_and_list_users() {
    let app = init_app!();

    let req = TestRequest::post()
        .uri("/api/users")
        .set_form([("username", "fcc_test")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "fcc_test");
    let id = body["_id"].as_str().unwrap().to_string();

    let req = TestRequest::get().uri("/api/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users, json!([{ "username": "fcc_test", "_id": id }]));
}

#[actix_rt::test]
async fn test_list_users_empty_is_array() {
    let app = init_app!();
    let req = TestRequest::get().uri("/api/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users, json!([]));
}

#[actix_rt::test]
async fn test_create_user_without_name() {
    let app = init_app!();
    let req = TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "username": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "username is required");
}

#[actix_rt::test]
async fn test_add_exercise_response_shape() {
    let app = init_app!();
    let id = create_user!(app, "runner");

    let resp = add_exercise!(app, id, "test", "60", "1990-01-01");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "_id": id,
            "username": "runner",
            "description": "test",
            "duration": 60,
            "date": "Mon Jan 01 1990",
        })
    );
}

#[actix_rt::test]
async fn test_add_exercise_json_numeric_duration() {
    let app = init_app!();
    let id = create_user!(app, "swimmer");

    let req = TestRequest::post()
        .uri(&format!("/api/users/{}/exercises", id))
        .set_json(json!({ "description": "laps", "duration": 45 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["duration"], 45);
    assert!(body["date"].as_str().is_some());
}

#[actix_rt::test]
async fn test_add_exercise_validation() {
    let app = init_app!();
    let id = create_user!(app, "lifter");

    let resp = add_exercise!(app, id, "squats", "abc", "");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = add_exercise!(app, id, "", "10", "");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = add_exercise!(app, id, "squats", "10", "2024-13-40");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = add_exercise!(app, "unknown-user", "squats", "10", "");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User not found");
}

#[actix_rt::test]
async fn test_log_filters() {
    let app = init_app!();
    let id = create_user!(app, "logger");

    for (desc, date) in [
        ("a", "2024-01-01"),
        ("b", "2024-01-15"),
        ("c", "2024-02-01"),
        ("d", "2024-03-01"),
    ] {
        let resp = add_exercise!(app, id, desc, "10", date);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = TestRequest::get()
        .uri(&format!("/api/users/{}/logs", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 4);
    assert_eq!(body["username"], "logger");
    assert_eq!(body["_id"], id.as_str());
    assert_eq!(
        body["log"][0],
        json!({ "description": "a", "duration": 10, "date": "Mon Jan 01 2024" })
    );

    let req = TestRequest::get()
        .uri(&format!(
            "/api/users/{}/logs?from=2024-01-10&to=2024-02-01",
            id
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["log"][0]["description"], "b");
    assert_eq!(body["log"][1]["description"], "c");

    let req = TestRequest::get()
        .uri(&format!("/api/users/{}/logs?limit=1", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);

    let req = TestRequest::get()
        .uri(&format!("/api/users/{}/logs?limit=many", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_log_unknown_user() {
    let app = init_app!();
    let req = TestRequest::get()
        .uri("/api/users/nobody/logs")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_delete_all() {
    let app = init_app!();
    let id = create_user!(app, "temp");
    let resp = add_exercise!(app, id, "walk", "5", "2024-05-05");
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/api/exercises/delete").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["deleted"], 1);

    let req = TestRequest::get().uri("/api/users/delete").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "All users have been deleted!");
    assert_eq!(body["deleted"], 1);

    let req = TestRequest::get().uri("/api/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users, json!([]));
}
