//! Common test utilities for exercising the conversion server.
//!
//! [`TestFixture`] wraps the router in-process so requests go through
//! `tower::ServiceExt::oneshot`; [`spawn_server`] serves the same router on a
//! real socket for client round trips.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use pixup_core::testing::MockRasterizer;
use pixup_core::{Config, ImageRasterizer, Rasterizer};
use pixup_server::api::create_router;
use pixup_server::state::AppState;

/// Re-export fixtures for test convenience
pub use pixup_core::testing::fixtures;

const BOUNDARY: &str = "pixup-test-boundary";

/// In-process server with either the real rasterizer or a mock.
pub struct TestFixture {
    pub router: Router,
    /// Present when the fixture was built with [`TestFixture::with_mock`].
    pub mock: Option<MockRasterizer>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestFixture {
    /// Fixture backed by the real image rasterizer.
    pub fn new() -> Self {
        Self::build(Arc::new(ImageRasterizer::new()), None, Config::default())
    }

    /// Fixture backed by a mock rasterizer the test keeps a handle to.
    pub fn with_mock(mock: MockRasterizer) -> Self {
        Self::build(Arc::new(mock.clone()), Some(mock), Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(Arc::new(ImageRasterizer::new()), None, config)
    }

    fn build(rasterizer: Arc<dyn Rasterizer>, mock: Option<MockRasterizer>, config: Config) -> Self {
        let state = Arc::new(AppState::new(config, rasterizer));
        Self {
            router: create_router(state),
            mock,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(&self, path: &str, form: MultipartForm) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, form.content_type())
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// Serves the real-rasterizer router on an ephemeral local port.
pub async fn spawn_server() -> (SocketAddr, JoinHandle<()>) {
    let state = Arc::new(AppState::new(
        Config::default(),
        Arc::new(ImageRasterizer::new()),
    ));
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}
