//! Exposes an in-process mock of the feed API for use in integration tests.
//!
//! ```
//! use feedload_test::server::TestServer;
//!
//! #[tokio::main]
//! async fn main() {
//!    let server = TestServer::new().await;
//!    let url = server.url("/health");
//!    // use the URL in tests...
//! }
//! ```
//!
//! The mock validates requests the same way the real API does for the parameters feedload sends:
//!
//! - `requesterPubkey` is required everywhere except on `/get-users` and `/health`.
//! - `limit` must be an integer in `1..=100`.
//! - `/get-post-details` requires an `id` of 64 hex characters.
//!
//! Violations are answered with `400 Bad Request`, unknown paths with `404 Not Found`.
//!
//! [`TestServer::with_status`] skips validation and answers every API request with a fixed status,
//! to simulate a misbehaving API.

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};

pub use axum::http::StatusCode;

const FEED_PATHS: &[&str] = &[
    "/get-posts",
    "/get-posts-watching",
    "/get-contents-following",
    "/get-replies",
    "/get-mentions",
    "/get-users",
    "/get-notifications",
    "/get-followed-users",
    "/get-users-following",
    "/get-users-followers",
];

const MAX_LIMIT: u32 = 100;
const POSTS_PER_PAGE: u64 = 3;

type Hits = Arc<Mutex<HashMap<String, usize>>>;

#[derive(Clone, Debug, Default)]
struct MockState {
    hits: Hits,
    status: Option<StatusCode>,
}

/// An in-process mock of the feed API for use in integration tests.
///
/// It listens on a random available port on localhost and stops when dropped.
#[derive(Debug)]
pub struct TestServer {
    handle: tokio::task::JoinHandle<()>,
    socket: SocketAddr,
    hits: Hits,
}

impl TestServer {
    /// Starts a mock that validates requests like the feed API.
    pub async fn new() -> Self {
        Self::start(None).await
    }

    /// Starts a mock that answers every API request with `status`. `/health` still answers 200.
    pub async fn with_status(status: StatusCode) -> Self {
        Self::start(Some(status)).await
    }

    async fn start(status: Option<StatusCode>) -> Self {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).unwrap();
        listener.set_nonblocking(true).unwrap();
        let socket = listener.local_addr().unwrap();

        let hits = Hits::default();
        let state = MockState {
            hits: hits.clone(),
            status,
        };
        let app = Router::new()
            .route("/health", get(health))
            .fallback(feed)
            .with_state(state);

        let handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            handle,
            socket,
            hits,
        }
    }

    /// Returns the base URL of the server, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.socket.port())
    }

    /// Returns a full URL pointing to the given path.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url(), path)
    }

    /// Number of requests received on `path`, regardless of their outcome.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Total number of requests received on API paths.
    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn feed(
    State(state): State<MockState>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path();
    let known = FEED_PATHS.contains(&path)
        || matches!(
            path,
            "/get-post-details" | "/get-user-details" | "/get-notifications-count"
        );
    if !known {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }
    *state.hits.lock().unwrap().entry(path.to_owned()).or_default() += 1;

    if let Some(status) = state.status {
        if status == StatusCode::OK {
            return Json(page(&params)).into_response();
        }
        return (status, Json(json!({ "error": "forced status" }))).into_response();
    }

    match respond(path, &params) {
        Ok(body) => Json(body).into_response(),
        Err(message) => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response(),
    }
}

fn respond(path: &str, params: &HashMap<String, String>) -> Result<Value, String> {
    if path != "/get-users" && !params.contains_key("requesterPubkey") {
        return Err("requesterPubkey is required".into());
    }

    if let Some(limit) = params.get("limit") {
        match limit.parse::<u32>() {
            Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => {}
            _ => return Err(format!("limit must be between 1 and {MAX_LIMIT}")),
        }
    }

    match path {
        "/get-post-details" => {
            let id = params.get("id").map(String::as_str).unwrap_or_default();
            if !is_content_id(id) {
                return Err("invalid post id".into());
            }
            Ok(json!({ "post": { "id": id }, "counts": { "replies": 0, "likes": 0 } }))
        }
        "/get-user-details" => Ok(json!({ "user": { "pubkey": params.get("user") } })),
        "/get-notifications-count" => Ok(json!({ "count": 0 })),
        _ => Ok(page(params)),
    }
}

fn page(params: &HashMap<String, String>) -> Value {
    let posts: Vec<_> = (1..=POSTS_PER_PAGE)
        .map(|n| json!({ "id": format!("{n:064x}") }))
        .collect();
    json!({
        "posts": posts,
        "pagination": {
            "before": params.get("before"),
            "after": params.get("after"),
            "hasMore": false,
        },
    })
}

fn is_content_id(id: &str) -> bool {
    id.len() == 64 && id.bytes().all(|b| b.is_ascii_hexdigit())
}
