use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_api::app::SessionLimits;
use stockroom_infra::JsonFileStore;

struct TestServer {
    base_url: String,
    data_file: PathBuf,
    handle: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with_limits(SessionLimits::default()).await
    }

    async fn spawn_with_limits(limits: SessionLimits) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let data_file = dir.path().join("depo_data.json");

        // Same router as prod, backed by a throwaway data file on an ephemeral port.
        let app = stockroom_api::app::build_app_with_limits(
            Arc::new(JsonFileStore::new(data_file.clone())),
            limits,
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            data_file,
            handle,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn stored(&self) -> Value {
        let text = std::fs::read_to_string(&self.data_file).expect("data file missing");
        serde_json::from_str(&text).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Open a fresh session and return its id.
async fn new_session(client: &reqwest::Client, srv: &TestServer) -> String {
    let res = client.get(srv.url("/items")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.headers()
        .get("x-session-id")
        .expect("session id header missing")
        .to_str()
        .unwrap()
        .to_string()
}

async fn post_json(
    client: &reqwest::Client,
    srv: &TestServer,
    session: &str,
    path: &str,
    body: Value,
) -> (StatusCode, Value) {
    let res = client
        .post(srv.url(path))
        .header("x-session-id", session)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn get_json(client: &reqwest::Client, srv: &TestServer, session: &str, path: &str) -> Value {
    let res = client
        .get(srv.url(path))
        .header("x-session-id", session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_needs_no_session() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-session-id").is_none());
}

#[tokio::test]
async fn invalid_session_header_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client
        .get(srv.url("/items"))
        .header("x-session-id", "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_session");
}

#[tokio::test]
async fn first_run_shows_seed_catalog_with_status() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = new_session(&client, &srv).await;

    let body = get_json(&client, &srv, &session, "/items").await;
    assert_eq!(body["count"], 10);
    let oil = &body["items"][5];
    assert_eq!(oil["code"], "M006");
    assert_eq!(oil["name"], "Hidrolik Yağ");
    assert_eq!(oil["status"], "Critical");
    assert_eq!(oil["status_class"], "critical");

    let metrics = get_json(&client, &srv, &session, "/metrics").await;
    assert_eq!(metrics["total_items"], 10);
    assert_eq!(metrics["total_quantity"], 2480);
    assert_eq!(metrics["by_status"]["critical"], 2);
}

#[tokio::test]
async fn request_lifecycle_create_approve_export() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = new_session(&client, &srv).await;

    let (status, body) = post_json(
        &client,
        &srv,
        &session,
        "/requests",
        json!({ "item_code": "M006", "amount": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["request"]["id"], 1);
    assert_eq!(body["request"]["status"], "Pending");
    assert_eq!(body["saved"], true);
    assert!(body["warning"].is_null());

    let stored = srv.stored();
    assert_eq!(stored["request_counter"], 2);
    assert_eq!(stored["pending_requests"][0]["item_code"], "M006");

    let (status, body) = post_json(&client, &srv, &session, "/requests/approve", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approved"], 1);

    let pending = get_json(&client, &srv, &session, "/requests/pending").await;
    assert_eq!(pending["count"], 0);
    let approved = get_json(&client, &srv, &session, "/requests/approved").await;
    assert_eq!(approved["requests"][0]["status"], "Approved");

    // Clearing an already-empty pending list is fine.
    let (status, body) = post_json(&client, &srv, &session, "/requests/clear", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], 0);

    let res = client
        .get(srv.url("/requests/approved/export"))
        .header("x-session-id", &session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("approved_requests_"));
    let bytes = res.bytes().await.unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("id,item_code,item_name,amount,date,status"));
    assert!(text.contains("1,M006,Hidrolik Yağ,10,"));
}

#[tokio::test]
async fn out_of_bounds_amount_is_rejected_without_state_change() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = new_session(&client, &srv).await;

    for amount in [0, -3, 26] {
        let (status, body) = post_json(
            &client,
            &srv,
            &session,
            "/requests",
            json!({ "item_code": "M006", "amount": amount }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
        assert_eq!(body["error"], "validation_error");
    }

    let (status, _) = post_json(
        &client,
        &srv,
        &session,
        "/requests",
        json!({ "item_code": "M999", "amount": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let pending = get_json(&client, &srv, &session, "/requests/pending").await;
    assert_eq!(pending["count"], 0);
}

#[tokio::test]
async fn quantity_update_and_reset() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = new_session(&client, &srv).await;

    let res = client
        .put(srv.url("/items/quantity"))
        .header("x-session-id", &session)
        .json(&json!({ "name": "Rulman", "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["updated"], true);

    // Zero stock: any request is out of bounds.
    let (status, _) = post_json(
        &client,
        &srv,
        &session,
        "/requests",
        json!({ "item_code": "M007", "amount": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&client, &srv, &session, "/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reset"], true);

    let stored = srv.stored();
    assert_eq!(stored["request_counter"], 1);
    assert_eq!(stored["stock_items"][6]["quantity"], 100);
}

#[tokio::test]
async fn sessions_are_isolated_until_refresh() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let first = new_session(&client, &srv).await;
    let second = new_session(&client, &srv).await;
    assert_ne!(first, second);

    let (status, _) = post_json(
        &client,
        &srv,
        &first,
        "/requests",
        json!({ "item_code": "M008", "amount": 500 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let pending = get_json(&client, &srv, &second, "/requests/pending").await;
    assert_eq!(pending["count"], 0);

    let (status, body) = post_json(&client, &srv, &second, "/refresh", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reloaded"], true);

    let pending = get_json(&client, &srv, &second, "/requests/pending").await;
    assert_eq!(pending["count"], 1);
    assert_eq!(pending["requests"][0]["item_name"], "Vida Seti");
}

#[tokio::test]
async fn stock_export_downloads_csv() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = new_session(&client, &srv).await;

    let res = client
        .get(srv.url("/items/export"))
        .header("x-session-id", &session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let text = res.text().await.unwrap();
    assert!(text.contains("M009,Motor Yağı,50,E-01,Critical"));
}

#[tokio::test]
async fn evicted_session_reopens_from_the_shared_file() {
    let srv = TestServer::spawn_with_limits(SessionLimits {
        max_sessions: 2,
        idle_ttl: Duration::from_secs(3600),
    })
    .await;
    let client = reqwest::Client::new();
    let first = new_session(&client, &srv).await;

    let res = client
        .put(srv.url("/items/quantity"))
        .header("x-session-id", &first)
        .json(&json!({ "name": "Vida Seti", "quantity": 40 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Header-less traffic pushes `first` out of the registry.
    for _ in 0..5 {
        new_session(&client, &srv).await;
    }

    let body = get_json(&client, &srv, &first, "/items").await;
    assert_eq!(body["items"][7]["name"], "Vida Seti");
    assert_eq!(body["items"][7]["quantity"], 40);
    assert_eq!(body["items"][7]["status"], "Critical");
}
