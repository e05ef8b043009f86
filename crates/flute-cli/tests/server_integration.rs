// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the development server.
//!
//! These tests drive the demo application through the real axum router.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::Value;
use tempfile::tempdir;

use flute::FluteConfig;
use flute_cli::demo::demo_processor;
use flute_cli::server::http::{create_router, AppState};
use flute_cli::server::session::{SessionStore, SESSION_COOKIE};

fn test_server(public_dir: &std::path::Path) -> TestServer {
    test_server_with_sessions(public_dir, SessionStore::default())
}

fn test_server_with_sessions(public_dir: &std::path::Path, sessions: SessionStore) -> TestServer {
    let processor = demo_processor(&FluteConfig::default()).unwrap();
    let state = Arc::new(AppState::new(processor).with_sessions(sessions));
    TestServer::new(create_router(state, public_dir)).unwrap()
}

/// Signs in and returns the `name=value` part of the session cookie.
async fn sign_in(server: &TestServer) -> String {
    let response = server.post("/signin/").form(&[("user", "ada")]).await;
    let cookie = header_value(&response, header::SET_COOKIE).unwrap();
    cookie.split(';').next().unwrap().to_string()
}

fn header_value(response: &axum_test::TestResponse, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn test_json_action() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/product/list/2/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let content_type = header_value(&response, header::CONTENT_TYPE).unwrap();
    assert!(content_type.starts_with("application/json"));
    let body: Value = response.json();
    assert_eq!(body["page"], 2);
    assert_eq!(body["products"][0], "Piccolo");
}

#[tokio::test]
async fn test_forward_renders_view() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["view"], "index.html");
    assert_eq!(body["data"]["title"], "flute");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/nowhere/at/all/").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("No action for /nowhere/at/all/"));
}

#[tokio::test]
async fn test_login_required_redirects() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/member/1/").await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        header_value(&response, header::LOCATION).as_deref(),
        Some("/signin/")
    );
}

#[tokio::test]
async fn test_signin_starts_session() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.post("/signin/").form(&[("user", "ada")]).await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(header_value(&response, header::LOCATION).as_deref(), Some("/"));
    let cookie = header_value(&response, header::SET_COOKIE).unwrap();
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
}

#[tokio::test]
async fn test_anonymous_request_sets_no_cookie() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/product/list/").await;
    assert!(header_value(&response, header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_public_files_are_served() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("style.css"), "body { color: black; }").unwrap();
    let server = test_server(dir.path());

    let response = server.get("/public/style.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "body { color: black; }");
}

#[tokio::test]
async fn test_session_cookie_grants_access() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let cookie = sign_in(&server).await;
    let response = server
        .get("/member/1/")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["view"], "member/member_detail.html");
}

#[tokio::test]
async fn test_idle_session_is_not_accepted() {
    let dir = tempdir().unwrap();
    let server = test_server_with_sessions(dir.path(), SessionStore::new(Duration::ZERO, 10));

    let cookie = sign_in(&server).await;
    let response = server
        .get("/member/1/")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        header_value(&response, header::LOCATION).as_deref(),
        Some("/signin/")
    );
}

#[tokio::test]
async fn test_session_ids_are_not_sequential() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path());

    let first = sign_in(&server).await;
    let second = sign_in(&server).await;
    let prefix = format!("{}=", SESSION_COOKIE);
    let first = first.strip_prefix(&prefix).unwrap();
    let second = second.strip_prefix(&prefix).unwrap();
    assert_eq!(first.len(), 32);
    assert_ne!(&first[..16], &second[..16]);
}
