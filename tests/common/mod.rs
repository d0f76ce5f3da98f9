//! Common test utilities and helpers
//!
//! Builds an in-process app backed by an in-memory database and a temporary
//! video directory, and drives it one request at a time.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use reel_feed::{
    config::Settings,
    db::connect_and_migrate,
    server::{AppState, create_app},
    session::MemorySessionStore,
    storage::{LocalSource, VideoSource},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// View limit used by the integration tests
pub const TEST_VIEW_LIMIT: u32 = 3;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub video_dir: TempDir,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    /// `name=value` part of a `Set-Cookie` header, if any
    pub cookie: Option<String>,
    pub body: Value,
}

/// Create test settings pointing at `video_dir`
pub fn create_test_settings(video_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.storage.video_dir = video_dir.path().to_path_buf();
    settings.database.url = "sqlite::memory:".to_string();
    settings.session.view_limit = TEST_VIEW_LIMIT;
    settings
}

/// Spawn an app whose video directory holds `videos`
pub async fn spawn_app(videos: &[&str]) -> TestApp {
    spawn_app_with(videos, |_| {}).await
}

/// Spawn an app after adjusting the test settings
pub async fn spawn_app_with(videos: &[&str], configure: impl FnOnce(&mut Settings)) -> TestApp {
    let video_dir = TempDir::new().unwrap();
    for name in videos {
        std::fs::write(video_dir.path().join(name), b"video-bytes").unwrap();
    }

    let mut settings = create_test_settings(&video_dir);
    configure(&mut settings);
    let sessions = MemorySessionStore::with_idle_ttl(settings.session.idle_ttl());
    let pool = connect_and_migrate(&settings.database.url).await.unwrap();
    let videos = VideoSource::Local(LocalSource::new(
        video_dir.path(),
        settings.storage.video_url_prefix.clone(),
    ));
    let state = AppState::from_parts(settings, pool, videos, Arc::new(sessions));

    TestApp {
        app: create_app(state.clone()),
        state,
        video_dir,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send("GET", uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send("POST", uri, cookie, body).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send("DELETE", uri, cookie, None).await
    }

    /// Send a request with a raw body
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.dispatch(request).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Open a session and return its cookie
    pub async fn new_session(&self) -> String {
        self.get("/api/auth/status", None)
            .await
            .cookie
            .expect("first contact issues a session cookie")
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            cookie,
            body,
        }
    }
}
