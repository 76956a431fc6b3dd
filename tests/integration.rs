//! Integration tests for the walletgate HTTP API.
//!
//! Each test spawns the full application on an ephemeral port and drives it
//! the way the browser client does: fetch a challenge, sign it with a wallet
//! key, submit the proof, then rely on the session cookie.

use k256::ecdsa::SigningKey;
use reqwest::StatusCode;
use walletgate::auth::verify::{address_of, sign_personal_message};
use walletgate::config::Config;

/// Deterministic wallet for testing.
fn test_wallet(seed: u8) -> (SigningKey, String) {
    let key = SigningKey::from_slice(&[seed; 32]).expect("valid test key");
    let address = address_of(key.verifying_key()).to_string();
    (key, address)
}

/// Spin up a test server and return its base URL.
async fn spawn_test_server() -> String {
    let config = Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: Some("http://localhost:5173".to_string()),
        ..Config::default()
    };

    let app = walletgate::app(walletgate::build_state(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Client that keeps cookies between requests, like a browser.
fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

async fn get_challenge(client: &reqwest::Client, base_url: &str, address: &str) -> String {
    let resp = client
        .get(format!("{}/login-challenge", base_url))
        .query(&[("address", address)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    body["message"].as_str().unwrap().to_string()
}

async fn submit_proof(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
    signature: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/login-verify", base_url))
        .json(&serde_json::json!({ "address": address, "signature": signature }))
        .send()
        .await
        .unwrap()
}

async fn profile(client: &reqwest::Client, base_url: &str) -> serde_json::Value {
    client
        .get(format!("{}/profile", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

// ============================================================================
// Login flow
// ============================================================================

#[tokio::test]
async fn test_login_profile_logout() {
    let base_url = spawn_test_server().await;
    let client = browser();
    let (key, address) = test_wallet(1);

    assert_eq!(
        profile(&client, &base_url).await,
        serde_json::json!({ "isLoggedIn": false })
    );

    let message = get_challenge(&client, &base_url, &address).await;
    let signature = sign_personal_message(&key, &message).unwrap();

    let resp = submit_proof(&client, &base_url, &address, &signature).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful!");

    let body = profile(&client, &base_url).await;
    assert_eq!(body["isLoggedIn"], true);
    assert_eq!(body["user"]["address"], address.as_str());

    let resp = client
        .post(format!("{}/logout", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    assert_eq!(profile(&client, &base_url).await["isLoggedIn"], false);
}

#[tokio::test]
async fn test_mixed_case_address_logs_in_normalized() {
    let base_url = spawn_test_server().await;
    let client = browser();
    let (key, address) = test_wallet(2);
    let shouted = format!("0x{}", address[2..].to_uppercase());

    let message = get_challenge(&client, &base_url, &shouted).await;
    let signature = sign_personal_message(&key, &message).unwrap();

    let resp = submit_proof(&client, &base_url, &address, &signature).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = profile(&client, &base_url).await;
    assert_eq!(body["user"]["address"], address.to_lowercase());
}

#[tokio::test]
async fn test_bearer_token_works_without_cookies() {
    let base_url = spawn_test_server().await;
    let client = reqwest::Client::new();
    let (key, address) = test_wallet(3);

    let message = get_challenge(&client, &base_url, &address).await;
    let signature = sign_personal_message(&key, &message).unwrap();
    let body: serde_json::Value = submit_proof(&client, &base_url, &address, &signature)
        .await
        .json()
        .await
        .unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let body: serde_json::Value = client
        .get(format!("{}/profile", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["isLoggedIn"], true);

    client
        .post(format!("{}/logout", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = client
        .get(format!("{}/profile", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["isLoggedIn"], false);
}

// ============================================================================
// Replay and forgery
// ============================================================================

#[tokio::test]
async fn test_replayed_proof_rejected() {
    let base_url = spawn_test_server().await;
    let client = browser();
    let (key, address) = test_wallet(4);

    let message = get_challenge(&client, &base_url, &address).await;
    let signature = sign_personal_message(&key, &message).unwrap();

    let resp = submit_proof(&client, &base_url, &address, &signature).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = submit_proof(&client, &base_url, &address, &signature).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Invalid or expired challenge. Please try again."
    );
}

#[tokio::test]
async fn test_forged_signature_rejected_and_challenge_burned() {
    let base_url = spawn_test_server().await;
    let client = browser();
    let (key, address) = test_wallet(5);
    let (forger, _) = test_wallet(6);

    let message = get_challenge(&client, &base_url, &address).await;

    let forged = sign_personal_message(&forger, &message).unwrap();
    let resp = submit_proof(&client, &base_url, &address, &forged).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The genuine signature arrives too late: the challenge is gone
    let genuine = sign_personal_message(&key, &message).unwrap();
    let resp = submit_proof(&client, &base_url, &address, &genuine).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(profile(&client, &base_url).await["isLoggedIn"], false);
}

#[tokio::test]
async fn test_garbage_signature_is_unauthorized() {
    let base_url = spawn_test_server().await;
    let client = browser();
    let (_, address) = test_wallet(7);

    get_challenge(&client, &base_url, &address).await;
    let resp = submit_proof(&client, &base_url, &address, "0xnot-a-signature").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Signature verification failed.");
}

#[tokio::test]
async fn test_invalid_address_rejected() {
    let base_url = spawn_test_server().await;
    let client = browser();

    let resp = client
        .get(format!("{}/login-challenge", base_url))
        .query(&[("address", "not-an-address")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_security_headers_and_cors() {
    let base_url = spawn_test_server().await;
    let client = browser();

    let resp = client
        .get(format!("{}/profile", base_url))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();

    let headers = resp.headers();
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}
