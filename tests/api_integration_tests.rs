//! Integration Tests for the HTTP surface
//!
//! Drives the full router against a temporary serving root.

use std::sync::Arc;
use std::time::Duration;

use asset_cache::{
    api::create_router,
    assets::FileStore,
    cache::{CacheStore, ManualClock},
    AppState,
};
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const TTL_MS: u64 = 300_000;

// == Helper Functions ==

struct TestServer {
    app: Router,
    clock: Arc<ManualClock>,
    root: TempDir,
}

impl TestServer {
    fn new(max_bytes: u64) -> Self {
        let root = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let cache = CacheStore::with_clock(max_bytes, clock.clone());
        let files = FileStore::new(root.path().to_string_lossy());
        let state = AppState::new(cache, files, Duration::from_millis(TTL_MS));

        Self {
            app: create_router(state),
            clock,
            root,
        }
    }

    fn write_file(&self, name: &str, contents: &[u8]) {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn stats(&self) -> Value {
        let response = self.get("/api/cache/stats").await;
        assert_eq!(response.status(), StatusCode::OK);
        body_to_json(response.into_body()).await
    }
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

fn x_cache(response: &Response<Body>) -> &str {
    response.headers()["x-cache"].to_str().unwrap()
}

// == Static Asset Tests ==

#[tokio::test]
async fn test_serves_file_then_hits_cache() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("hello.txt", b"hello world");

    let first = server.get("/hello.txt").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(x_cache(&first), "MISS");
    assert_eq!(
        first.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(first.headers()[header::CACHE_CONTROL], "public, max-age=300");
    assert!(first.headers().get(header::ETAG).is_some());
    assert!(first.headers().get(header::LAST_MODIFIED).is_some());
    assert_eq!(body_bytes(first.into_body()).await, b"hello world");

    let second = server.get("/hello.txt").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(x_cache(&second), "HIT");
    assert_eq!(body_bytes(second.into_body()).await, b"hello world");
}

#[tokio::test]
async fn test_root_serves_index_document() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("index.html", b"<h1>home</h1>");
    server.write_file("docs/index.html", b"<h1>docs</h1>");

    let response = server.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(body_bytes(response.into_body()).await, b"<h1>home</h1>");

    let response = server.get("/docs/").await;
    assert_eq!(body_bytes(response.into_body()).await, b"<h1>docs</h1>");
}

#[tokio::test]
async fn test_repeated_slashes_share_one_entry() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("a.css", b"a{}");

    let response = server.get("/a.css").await;
    assert_eq!(x_cache(&response), "MISS");
    let response = server.get("//a.css").await;
    assert_eq!(x_cache(&response), "HIT");

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 1);
}

#[tokio::test]
async fn test_conditional_get_not_modified() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("app.js", b"console.log(1);");

    let first = server.get("/app.js").await;
    let etag = first.headers()[header::ETAG].clone();

    let response = server
        .send(
            Request::builder()
                .uri("/app.js")
                .header(header::IF_NONE_MATCH, etag.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers()[header::ETAG], etag);
    assert!(body_bytes(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_conditional_get_with_stale_validator() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("app.js", b"console.log(2);");

    let response = server
        .send(
            Request::builder()
                .uri("/app.js")
                .header(header::IF_NONE_MATCH, "\"00000000-0\"")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"console.log(2);");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let server = TestServer::new(1024 * 1024);

    let response = server.get("/missing.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("missing.css"));

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 0);
}

#[tokio::test]
async fn test_traversal_is_rejected_before_cache() {
    let server = TestServer::new(1024 * 1024);

    for uri in ["/../secret.txt", "/css/%2e%2e/%2e%2e/secret.txt"] {
        let response = server.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 0);
}

#[tokio::test]
async fn test_expired_entry_is_reloaded_from_disk() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("style.css", b"body{color:red}");

    let response = server.get("/style.css").await;
    assert_eq!(x_cache(&response), "MISS");

    // Within the TTL the cached copy wins even after an edit on disk
    server.write_file("style.css", b"body{color:blue}");
    server.clock.set(TTL_MS);
    let response = server.get("/style.css").await;
    assert_eq!(x_cache(&response), "HIT");
    assert_eq!(body_bytes(response.into_body()).await, b"body{color:red}");

    server.clock.set(TTL_MS + 1);
    let response = server.get("/style.css").await;
    assert_eq!(x_cache(&response), "MISS");
    assert_eq!(body_bytes(response.into_body()).await, b"body{color:blue}");

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["size_bytes"], 16);
}

#[tokio::test]
async fn test_size_budget_evicts_oldest() {
    let server = TestServer::new(150);
    server.write_file("a.bin", &[b'a'; 100]);
    server.write_file("b.bin", &[b'b'; 100]);

    server.get("/a.bin").await;
    server.clock.advance(1);
    server.get("/b.bin").await;

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["size_bytes"], 100);
    assert_eq!(stats["size_evictions"], 1);

    // /a.bin was the oldest and is gone, /b.bin is still cached
    let response = server.get("/b.bin").await;
    assert_eq!(x_cache(&response), "HIT");
    let response = server.get("/a.bin").await;
    assert_eq!(x_cache(&response), "MISS");
}

#[tokio::test]
async fn test_oversized_file_is_served_uncached() {
    let server = TestServer::new(10);
    server.write_file("big.bin", &[7u8; 64]);

    let response = server.get("/big.bin").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, vec![7u8; 64]);

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 0);
    assert_eq!(stats["size_bytes"], 0);
}

// == Administrative Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_cached_bytes() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("a.css", &[b'x'; 300]);
    server.write_file("b.js", &[b'y'; 200]);

    server.get("/a.css").await;
    server.get("/b.js").await;

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 2);
    assert_eq!(stats["size_bytes"], 500);
    assert_eq!(stats["max_size_bytes"], 1024 * 1024);
    assert_eq!(stats["ttl_ms"], TTL_MS);
    assert!(stats["size_mb"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_clear_endpoint() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("a.css", b"a{}");
    server.get("/a.css").await;

    let response = server
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "cleared");

    let stats = server.stats().await;
    assert_eq!(stats["entries"], 0);
    assert_eq!(stats["size_bytes"], 0);

    let response = server.get("/a.css").await;
    assert_eq!(x_cache(&response), "MISS");
}

#[tokio::test]
async fn test_evict_entry_endpoint() {
    let server = TestServer::new(1024 * 1024);
    server.write_file("logo.png", b"\x89PNG");
    server.get("/logo.png").await;

    let evict = || {
        Request::builder()
            .method("DELETE")
            .uri("/api/cache/entry?path=/logo.png")
            .body(Body::empty())
            .unwrap()
    };

    let response = server.send(evict()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["key"].as_str().unwrap().ends_with("/logo.png"));

    let response = server.send(evict()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new(1024);

    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
