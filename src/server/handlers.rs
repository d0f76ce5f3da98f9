//! HTTP request handlers
//!
//! Every handler answers with the `{success, ...}` envelope. Failures are
//! returned as [`Error`] and rendered by its `IntoResponse` impl.

use crate::{
    Error, Result,
    server::app::AppState,
    session::{SessionToken, ViewStatus},
    types::{
        AccountPayload, AddReelRequest, ApiResponse, AuthStatusPayload, HealthPayload,
        LoginRequest, MessagePayload, ReelCreatedPayload, ReelsPayload, RegisterRequest,
    },
    utils::version,
};
use axum::{
    extract::{
        Extension, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Json,
};

type ApiResult<T> = Result<Json<ApiResponse<T>>>;

/// List reels
///
/// GET /api/reels
pub async fn list_reels(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<ReelsPayload> {
    let listing = state.videos.list_reels().await?;
    let session = state.sessions.load_or_default(&token).await?;

    tracing::debug!(
        count = listing.len(),
        source = listing.source.as_str(),
        "listed reels"
    );

    Ok(Json(ApiResponse::ok(ReelsPayload {
        count: listing.len(),
        source: listing.source,
        reels: listing.reels,
        user: state.quota.viewer_status(&session),
    })))
}

/// Count one watched reel against the visitor's quota
///
/// POST /api/track-view
pub async fn track_view(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<ViewStatus> {
    let _guard = state.session_locks.lock(&token).await;
    let mut session = state.sessions.load_or_default(&token).await?;
    let status = state.quota.record_view(&mut session);
    state.sessions.save(&token, &session).await?;

    if status.requires_login {
        tracing::debug!(views = status.views_count, "anonymous view limit reached");
    }
    Ok(Json(ApiResponse::ok(status)))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AccountPayload>>)> {
    let Json(request) = payload.map_err(invalid_body)?;
    let auth = state
        .accounts
        .register(&request.username, &request.email, &request.password)
        .await?;
    let _guard = state.session_locks.lock(&token).await;
    state.sessions.save(&token, &auth.session).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AccountPayload {
            message: "Registration successful".to_string(),
            user: auth.account.summary(),
        })),
    ))
}

/// POST /api/auth/login
///
/// `username` may hold either the username or the email address.
pub async fn login(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AccountPayload> {
    let Json(request) = payload.map_err(invalid_body)?;
    let auth = state
        .accounts
        .login(&request.username, &request.password)
        .await?;
    let _guard = state.session_locks.lock(&token).await;
    state.sessions.save(&token, &auth.session).await?;

    Ok(Json(ApiResponse::ok(AccountPayload {
        message: "Login successful".to_string(),
        user: auth.account.summary(),
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<MessagePayload> {
    let _guard = state.session_locks.lock(&token).await;
    state
        .accounts
        .logout(state.sessions.as_ref(), &token)
        .await?;
    Ok(Json(ApiResponse::ok(MessagePayload::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/status
pub async fn auth_status(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<AuthStatusPayload> {
    let session = state.sessions.load_or_default(&token).await?;
    let viewer = state.quota.viewer_status(&session);

    Ok(Json(ApiResponse::ok(AuthStatusPayload {
        is_logged_in: viewer.is_logged_in,
        user: session.user(),
        views_count: viewer.views_count,
        views_remaining: viewer.views_remaining,
    })))
}

/// Add a reel to the catalog
///
/// POST /api/reels
pub async fn add_reel(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    payload: std::result::Result<Json<AddReelRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ReelCreatedPayload>>)> {
    require_login(&state, &token).await?;
    let Json(request) = payload.map_err(invalid_body)?;

    let url = request.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(Error::validation("URL is required"));
    }

    let reel_id = state
        .catalog
        .insert(
            url,
            request.title.as_deref().unwrap_or_default(),
            request.description.as_deref().unwrap_or_default(),
        )
        .await?;
    tracing::info!(reel_id, "reel added to catalog");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ReelCreatedPayload {
            message: "Reel added successfully".to_string(),
            reel_id,
        })),
    ))
}

/// Remove a reel from the catalog
///
/// DELETE /api/reels/{id}
pub async fn delete_reel(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> ApiResult<MessagePayload> {
    require_login(&state, &token).await?;
    let Path(id) = id.map_err(|_| Error::validation("Invalid reel id"))?;

    if !state.catalog.delete(id).await? {
        return Err(Error::not_found("Reel not found"));
    }
    tracing::info!(reel_id = id, "reel removed from catalog");

    Ok(Json(ApiResponse::ok(MessagePayload::new(
        "Reel deleted successfully",
    ))))
}

/// Health check
///
/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthPayload>> {
    let uptime = state.start_time.elapsed().as_secs();
    tracing::debug!("Health check: uptime={}s", uptime);
    Json(ApiResponse::ok(HealthPayload::new(
        uptime,
        version::get_version(),
    )))
}

/// Fallback for unknown routes
pub async fn not_found() -> Error {
    Error::not_found("Not found")
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed() -> Error {
    Error::method_not_allowed("Method not allowed")
}

async fn require_login(state: &AppState, token: &SessionToken) -> Result<()> {
    let session = state.sessions.load_or_default(token).await?;
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(Error::authentication("Login required"))
    }
}

fn invalid_body(rejection: JsonRejection) -> Error {
    Error::validation(format!("Invalid request body: {}", rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Settings,
        db::connect_and_migrate,
        session::{MemorySessionStore, SessionData, SessionStore},
        storage::{LocalSource, VideoSource},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Store that stalls after reading, widening the gap before the save
    #[derive(Debug, Default)]
    struct SlowLoadStore {
        inner: MemorySessionStore,
    }

    #[async_trait::async_trait]
    impl SessionStore for SlowLoadStore {
        async fn load(&self, token: &SessionToken) -> Result<Option<SessionData>> {
            let data = self.inner.load(token).await?;
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(data)
        }

        async fn save(&self, token: &SessionToken, data: &SessionData) -> Result<()> {
            self.inner.save(token, data).await
        }

        async fn remove(&self, token: &SessionToken) -> Result<()> {
            self.inner.remove(token).await
        }
    }

    async fn create_state_with_store(dir: &TempDir, sessions: Arc<dyn SessionStore>) -> AppState {
        let mut settings = Settings::default();
        settings.session.view_limit = 2;
        let pool = connect_and_migrate("sqlite::memory:").await.unwrap();
        let videos = VideoSource::Local(LocalSource::new(dir.path(), "/videos"));
        AppState::from_parts(settings, pool, videos, sessions)
    }

    async fn create_test_state(dir: &TempDir) -> AppState {
        create_state_with_store(dir, Arc::new(MemorySessionStore::new())).await
    }

    #[tokio::test]
    async fn test_health_handler() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        let response = health(State(state)).await;

        assert!(response.success);
        assert_eq!(response.data.version, version::get_version());
        assert!(response.data.server_uptime < 10);
    }

    #[tokio::test]
    async fn test_list_reels_reports_viewer() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sunset_walk.mp4"), b"x").unwrap();
        let state = create_test_state(&dir).await;

        let Json(response) = list_reels(State(state), Extension(SessionToken::generate()))
            .await
            .unwrap();

        assert_eq!(response.data.count, 1);
        assert_eq!(response.data.reels[0].title, "sunset walk");
        assert!(!response.data.user.is_logged_in);
        assert_eq!(response.data.user.views_remaining, Some(2));
    }

    #[tokio::test]
    async fn test_track_view_persists_count() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        let token = SessionToken::generate();

        for _ in 0..2 {
            track_view(State(state.clone()), Extension(token.clone()))
                .await
                .unwrap();
        }
        let Json(response) = track_view(State(state.clone()), Extension(token.clone()))
            .await
            .unwrap();

        assert_eq!(response.data.views_count, 3);
        assert_eq!(response.data.views_remaining, Some(0));
        assert!(response.data.requires_login);

        let stored = state.sessions.load(&token).await.unwrap().unwrap();
        assert_eq!(stored.views_count, 3);
    }

    #[tokio::test]
    async fn test_register_logs_visitor_in() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        let token = SessionToken::generate();

        let request = RegisterRequest::new("alice", "alice@example.com", "secret1");
        let (status, Json(response)) =
            register(State(state.clone()), Extension(token.clone()), Ok(Json(request)))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.data.user.username, "alice");

        let session = state.sessions.load_or_default(&token).await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.views_count, 0);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        state
            .accounts
            .register("bob", "bob@example.com", "hunter22")
            .await
            .unwrap();

        let result = login(
            State(state),
            Extension(SessionToken::generate()),
            Ok(Json(LoginRequest::new("bob", "wrong-password"))),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[tokio::test]
    async fn test_login_during_view_is_not_lost() {
        let dir = TempDir::new().unwrap();
        let state = create_state_with_store(&dir, Arc::new(SlowLoadStore::default())).await;
        state
            .accounts
            .register("erin", "erin@example.com", "password")
            .await
            .unwrap();
        let token = SessionToken::generate();

        let (viewed, logged_in) = tokio::join!(
            track_view(State(state.clone()), Extension(token.clone())),
            login(
                State(state.clone()),
                Extension(token.clone()),
                Ok(Json(LoginRequest::new("erin", "password"))),
            ),
        );
        viewed.unwrap();
        logged_in.unwrap();

        let session = state.sessions.load_or_default(&token).await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.username.as_deref(), Some("erin"));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        let token = SessionToken::generate();
        register(
            State(state.clone()),
            Extension(token.clone()),
            Ok(Json(RegisterRequest::new("carol", "carol@example.com", "password"))),
        )
        .await
        .unwrap();

        logout(State(state.clone()), Extension(token.clone()))
            .await
            .unwrap();

        let Json(status) = auth_status(State(state), Extension(token)).await.unwrap();
        assert!(!status.data.is_logged_in);
        assert!(status.data.user.is_none());
        assert_eq!(status.data.views_remaining, Some(2));
    }

    #[tokio::test]
    async fn test_add_reel_requires_login() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        let request = AddReelRequest {
            url: Some("https://cdn.example.com/clip.mp4".to_string()),
            title: None,
            description: None,
        };

        let err = add_reel(
            State(state.clone()),
            Extension(SessionToken::generate()),
            Ok(Json(request)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.catalog.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_reel() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir).await;
        let token = SessionToken::generate();
        let auth = state
            .accounts
            .register("dave", "dave@example.com", "password")
            .await
            .unwrap();
        state.sessions.save(&token, &auth.session).await.unwrap();

        let err = delete_reel(State(state), Extension(token), Ok(Path(999)))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Reel not found");
    }

    #[tokio::test]
    async fn test_not_found_fallback() {
        let err = not_found().await;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = method_not_allowed().await;
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
