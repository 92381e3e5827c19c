//! HTTP tests for the statistics endpoints that never reach the database:
//! authentication, batch validation and name validation.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{
    basic_auth_header, body_json, build_test_app, send, send_raw, STATS_PASSWORD, STATS_USER,
};

fn valid_auth() -> Option<String> {
    Some(basic_auth_header(STATS_USER, STATS_PASSWORD))
}

fn entry(difficulty: &str) -> serde_json::Value {
    json!({
        "account": "Acc",
        "character": "Nihlathak",
        "difficulty": difficulty,
        "totalkills": 3,
        "special": { "Baal": 1 },
        "area": { "Worldstone Keep": { "kills": 3, "time": 40 } }
    })
}

#[tokio::test]
async fn post_without_credentials_is_unauthorized() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([entry("Normal")])),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn post_with_wrong_password_is_unauthorized() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([entry("Normal")])),
        Some(basic_auth_header(STATS_USER, "wrong")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn post_with_bearer_token_is_unauthorized() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([])),
        Some("Bearer abc.def".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn batch_with_unknown_difficulty_is_rejected() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([entry("Normal"), entry("inferno")])),
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("inferno"));
}

#[tokio::test]
async fn empty_batch_is_accepted() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([])),
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "accepted");
}

#[tokio::test]
async fn delete_without_credentials_is_unauthorized() {
    let response = send(
        build_test_app(),
        Method::DELETE,
        "/api/v1/statistics/nihlathak",
        None,
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_with_single_letter_name_is_rejected() {
    let response = send(
        build_test_app(),
        Method::DELETE,
        "/api/v1/statistics/n",
        None,
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn lower_case_difficulty_is_rejected() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([entry("hell")])),
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn negative_counter_is_a_json_bad_request() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([{ "character": "nokka", "difficulty": "Hell", "totalkills": -1 }])),
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("totalkills"));
}

#[tokio::test]
async fn wrongly_typed_field_is_a_json_bad_request() {
    let response = send(
        build_test_app(),
        Method::POST,
        "/api/v1/statistics",
        Some(json!([{ "character": "nokka", "difficulty": "Hell", "special": "Baal" }])),
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_json_body_is_a_json_bad_request() {
    let response = send_raw(
        build_test_app(),
        "/api/v1/statistics",
        "application/json",
        "not json",
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_json_content_type_is_a_json_bad_request() {
    let response = send_raw(
        build_test_app(),
        "/api/v1/statistics",
        "text/plain",
        "[]",
        valid_auth(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
