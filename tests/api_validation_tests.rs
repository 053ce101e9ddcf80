// SPDX-License-Identifier: MIT

//! API input validation tests.
//!
//! Bounds and normalization are enforced server-side; a well-behaved
//! client is not assumed.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

const USER: &str = "ab12345@essex.ac.uk";

fn create_request(cookie: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/listings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_title_over_50_chars_is_rejected() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .oneshot(create_request(
            &cookie,
            json!({
                "title": "a".repeat(60),
                "description": "Fine description",
                "category": "skill",
                "type": "offer",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_description_over_200_chars_is_rejected() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .oneshot(create_request(
            &cookie,
            json!({
                "title": "Fine title",
                "description": "d".repeat(201),
                "category": "skill",
                "type": "offer",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .oneshot(create_request(&cookie, json!({ "title": "Only a title" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_listing_is_forced_into_need_category() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .oneshot(create_request(
            &cookie,
            json!({
                "title": "Need a tutor",
                "description": "Please help",
                "category": "skill",
                "type": "request",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["listing"]["category"], "need");
    assert_eq!(body["listing"]["type"], "request");
}

#[tokio::test]
async fn test_tags_are_lowercased_and_capped_at_five() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .clone()
        .oneshot(create_request(
            &cookie,
            json!({
                "title": "Guitar lessons",
                "description": "Strumming and chords",
                "category": "skill",
                "type": "offer",
                "tags": ["Music", " GUITAR "],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["listing"]["tags"], json!(["music", "guitar"]));

    let response = app
        .oneshot(create_request(
            &cookie,
            json!({
                "title": "Too many tags",
                "description": "Six of them",
                "category": "skill",
                "type": "offer",
                "tags": ["a", "b", "c", "d", "e", "f"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .oneshot(create_request(
            &cookie,
            json!({
                "title": "Title",
                "description": "Description",
                "category": "vehicle",
                "type": "offer",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_category_filter_is_rejected() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/listings?category=vehicle")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_listing_is_uniform_404() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/listings/no-such-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_toggle_saved_requires_listing_id() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, USER);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/saved")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(json!({}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
