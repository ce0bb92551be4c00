//! End-to-end tests
//! Starts the real server on an ephemeral port and talks to it over HTTP
//!
//! Run with: cargo test --test e2e_tests

use accountd::api::{serve, AppState};
use accountd::config::{Config, StoreBackend};
use accountd::store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Helper to start the API server in background, returning its base URL
async fn start_test_server() -> (String, tokio::task::JoinHandle<()>) {
    let mut config = Config::default();
    config.database.backend = StoreBackend::Memory;
    config.auth.bcrypt_cost = 4;

    let state = AppState::with_store(config, Arc::new(MemoryStore::new()))
        .expect("valid test config");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let _ = serve(listener, Arc::new(state)).await;
    });

    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn test_full_account_flow_over_http() {
    let (base, server_handle) = start_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register", base))
        .json(&json!({
            "email": "a@b.com",
            "msisdn": "123",
            "username": "alice",
            "password": "p1",
            "role": 0
        }))
        .send()
        .await
        .expect("register request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Register success");

    let response = client
        .post(format!("{}/login", base))
        .json(&json!({"username": "alice", "password": "p1", "role": 0}))
        .send()
        .await
        .expect("login request");
    assert!(response.status().is_success());
    let token = response
        .headers()
        .get("token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("token header");

    let response = client
        .post(format!("{}/viewprofile", base))
        .header("token", token)
        .send()
        .await
        .expect("profile request");
    assert!(response.status().is_success());
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["password"], "*");

    let response = client
        .post(format!("{}/login", base))
        .json(&json!({"username": "alice", "password": "wrong", "role": 0}))
        .send()
        .await
        .expect("login request");
    assert_eq!(response.status().as_u16(), 401);
    assert!(response.headers().get("token").is_none());

    server_handle.abort();
}

#[tokio::test]
async fn test_concurrent_logins_over_http() {
    let (base, server_handle) = start_test_server().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/register", base))
        .json(&json!({
            "email": "c@b.com",
            "msisdn": "456",
            "username": "carol",
            "password": "pw",
            "role": 1
        }))
        .send()
        .await
        .expect("register request");

    let mut handles = vec![];
    for _ in 0..10 {
        let client = client.clone();
        let url = format!("{}/login", base);
        handles.push(tokio::spawn(async move {
            let response = client
                .post(url)
                .json(&json!({"username": "carol", "password": "pw", "role": 1}))
                .send()
                .await
                .expect("login request");
            response
                .headers()
                .get("token")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        }));
    }

    let mut tokens = std::collections::HashSet::new();
    for handle in handles {
        let token = handle.await.unwrap().expect("token header");
        assert!(tokens.insert(token), "duplicate session token");
    }
    assert_eq!(tokens.len(), 10);

    server_handle.abort();
}
