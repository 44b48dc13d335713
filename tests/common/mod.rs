//! In-process stub of the TorrentClaw API
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use parking_lot::Mutex;

use torrentclaw_mcp::client::TorrentClawClient;
use torrentclaw_mcp::config::{Config, RetryConfig};

pub const API_KEY: &str = "tc_test_key";

/// One request as the stub saw it
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Default)]
struct Stub {
    /// `"GET /api/v1/stats"` -> scripted replies; the last one repeats
    routes: HashMap<String, Vec<(u16, String)>>,
    log: Mutex<Vec<Hit>>,
}

#[derive(Default)]
pub struct StubBuilder {
    routes: HashMap<String, Vec<(u16, String)>>,
}

impl StubBuilder {
    /// Queue a reply for `method path`
    pub fn reply(mut self, method: &str, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .entry(format!("{method} {path}"))
            .or_default()
            .push((status, body.into()));
        self
    }

    pub async fn start(self) -> StubServer {
        let state = Arc::new(Stub {
            routes: self.routes,
            log: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubServer {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}

async fn handle(State(stub): State<Arc<Stub>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let hit = Hit {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let key = format!("{} {}", hit.method, hit.path);
    let (status, body) = {
        let mut log = stub.log.lock();
        let seen = log
            .iter()
            .filter(|h| h.method == hit.method && h.path == hit.path)
            .count();
        log.push(hit);
        match stub.routes.get(&key) {
            Some(replies) => replies[seen.min(replies.len() - 1)].clone(),
            None => (404, r#"{"error":"not found"}"#.to_string()),
        }
    };

    Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub struct StubServer {
    pub base_url: String,
    state: Arc<Stub>,
}

impl StubServer {
    pub fn builder() -> StubBuilder {
        StubBuilder::default()
    }

    /// Requests received for `path`
    pub fn hits(&self, path: &str) -> usize {
        self.state.log.lock().iter().filter(|h| h.path == path).count()
    }

    pub fn requests(&self) -> Vec<Hit> {
        self.state.log.lock().clone()
    }

    pub fn last_request(&self) -> Hit {
        self.state.log.lock().last().cloned().unwrap()
    }

    /// Loopback config with a fast retry schedule
    pub fn config(&self) -> Config {
        Config {
            api_url: self.base_url.clone(),
            api_key: Some(API_KEY.to_string()),
            allow_private: true,
            retry: RetryConfig {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(5),
                max_backoff: Duration::from_millis(20),
                multiplier: 2.0,
            },
            ..Config::default()
        }
    }

    pub fn client(&self) -> TorrentClawClient {
        TorrentClawClient::new(&self.config()).unwrap()
    }
}

pub const STATS_BODY: &str = r#"{
    "content": {"movies": 1200, "shows": 340, "tmdbEnriched": 1500},
    "torrents": {"total": 9800, "withSeeders": 7100, "bySource": {"yts": 5000, "eztv": 4800}},
    "recentIngestions": [
        {"source": "yts", "status": "completed", "startedAt": "2026-02-01T10:00:00Z",
         "completedAt": "2026-02-01T10:05:00Z", "fetched": 50, "new": 10, "updated": 5}
    ]
}"#;

pub const SEARCH_BODY: &str = r#"{
    "total": 1,
    "page": 1,
    "pageSize": 20,
    "results": [{
        "id": 42,
        "imdbId": "tt1160419",
        "tmdbId": "438631",
        "contentType": "movie",
        "title": "Dune",
        "year": 2021,
        "genres": ["Science Fiction", "Adventure"],
        "ratingImdb": "8.0",
        "ratingTmdb": "7.8",
        "contentUrl": "https://torrentclaw.com/movies/dune-2021",
        "hasTorrents": true,
        "torrents": [{
            "infoHash": "ABCDEF0123456789ABCDEF0123456789ABCDEF01",
            "quality": "1080p",
            "sizeBytes": "1073741824",
            "seeders": 120,
            "leechers": 4,
            "magnetUrl": "magnet:?xt=urn:btih:abcdef0123456789abcdef0123456789abcdef01&tr=udp://tracker",
            "source": "yts",
            "qualityScore": 85
        }]
    }]
}"#;

pub const HASH: &str = "abcdef0123456789abcdef0123456789abcdef01";
