// SPDX-License-Identifier: MIT

//! Listing browse filters and ordering.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

mod common;

async fn list(app: &axum::Router, uri: &str) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    body["listings"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_listings_are_sorted_newest_first() {
    let (app, _) = common::create_test_app();

    let listings = list(&app, "/api/listings").await;
    assert_eq!(listings.len(), 7);

    let timestamps: Vec<&str> = listings
        .iter()
        .map(|l| l["createdAt"].as_str().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn test_type_offer_filter() {
    let (app, _) = common::create_test_app();

    let listings = list(&app, "/api/listings?type=offer").await;
    assert!(!listings.is_empty());
    assert!(listings.iter().all(|l| l["type"] == "offer"));
}

#[tokio::test]
async fn test_type_request_filter_selects_needs() {
    let (app, _) = common::create_test_app();

    let listings = list(&app, "/api/listings?type=request").await;
    assert!(!listings.is_empty());
    assert!(listings.iter().all(|l| l["category"] == "need"));
}

#[tokio::test]
async fn test_category_filter() {
    let (app, _) = common::create_test_app();

    let listings = list(&app, "/api/listings?category=item").await;
    assert!(!listings.is_empty());
    assert!(listings.iter().all(|l| l["category"] == "item"));
}

#[tokio::test]
async fn test_user_filter() {
    let (app, _) = common::create_test_app();

    let listings = list(&app, "/api/listings?userId=user-1").await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], "seed-1");
}

#[tokio::test]
async fn test_free_text_search_is_case_insensitive() {
    let (app, _) = common::create_test_app();

    // Matches "Guitar Lessons" by title
    let listings = list(&app, "/api/listings?q=GUITAR").await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], "seed-1");

    // Matches by tag
    let listings = list(&app, "/api/listings?q=textbooks").await;
    assert!(!listings.is_empty());
}

#[tokio::test]
async fn test_free_text_search_does_not_match_poster_fields() {
    let (app, _) = common::create_test_app();

    // Poster emails are only searchable through the admin surface
    let listings = list(&app, "/api/listings?q=sc21234").await;
    assert!(listings.is_empty());
}

#[tokio::test]
async fn test_admin_search_matches_poster_email() {
    let (app, state) = common::create_test_app();
    let cookie = common::session_cookie_for(&state, "vs22222@essex.ac.uk");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/admin/listings?q=sc21234")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let listings = body["listings"].as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], "seed-1");
}

#[tokio::test]
async fn test_get_single_listing() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/listings/seed-3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["listing"]["id"], "seed-3");
    assert_eq!(body["listing"]["category"], "need");
    assert_eq!(body["listing"]["type"], "request");
}
