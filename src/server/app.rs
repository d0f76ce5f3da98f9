//! Axum application setup
//!
//! Creates the application state from [`Settings`] and wires routes and
//! middleware around it.

use crate::{
    Result,
    accounts::AccountManager,
    config::{SessionBackend, Settings},
    db::{self, AccountRepository, CatalogRepository, SqlitePool},
    session::{
        MemorySessionStore, QuotaTracker, SessionLocks, SessionStore, SqliteSessionStore,
    },
    storage::VideoSource,
};
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,
    /// Where reels are listed from
    pub videos: Arc<VideoSource>,
    /// Visitor sessions keyed by cookie token
    pub sessions: Arc<dyn SessionStore>,
    /// Serializes load-modify-save cycles per token
    pub session_locks: SessionLocks,
    pub accounts: AccountManager,
    /// Legacy reel metadata
    pub catalog: CatalogRepository,
    pub quota: QuotaTracker,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Connect to the database, create the schema and select the video source
    pub async fn build(settings: Settings) -> Result<Self> {
        let pool = db::connect_and_migrate(&settings.database.url).await?;
        let catalog = CatalogRepository::new(pool.clone());
        let videos = VideoSource::from_settings(&settings, catalog).await?;

        let idle_ttl = settings.session.idle_ttl();
        let sessions: Arc<dyn SessionStore> = match settings.session.backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::with_idle_ttl(idle_ttl)),
            SessionBackend::Sqlite => {
                Arc::new(SqliteSessionStore::new(pool.clone()).with_idle_ttl(idle_ttl))
            }
        };
        tracing::debug!(
            backend = ?settings.session.backend,
            idle_ttl_secs = idle_ttl.as_secs(),
            "session store ready"
        );

        Ok(Self::from_parts(settings, pool, videos, sessions))
    }

    /// Assemble state from already constructed collaborators
    pub fn from_parts(
        settings: Settings,
        pool: SqlitePool,
        videos: VideoSource,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let quota = QuotaTracker::new(settings.session.view_limit);
        Self {
            settings: Arc::new(settings),
            videos: Arc::new(videos),
            sessions,
            session_locks: SessionLocks::new(),
            accounts: AccountManager::new(AccountRepository::new(pool.clone())),
            catalog: CatalogRepository::new(pool),
            quota,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Create the main Axum application with routes and middleware
pub fn create_app(state: AppState) -> Router {
    let video_prefix = state
        .settings
        .storage
        .video_url_prefix
        .trim_end_matches('/')
        .to_string();
    let video_files = ServeDir::new(&state.settings.storage.video_dir);

    Router::new()
        .route(
            "/api/reels",
            get(super::handlers::list_reels).post(super::handlers::add_reel),
        )
        .route("/api/reels/{id}", delete(super::handlers::delete_reel))
        .route("/api/track-view", post(super::handlers::track_view))
        .route("/api/auth/register", post(super::handlers::register))
        .route("/api/auth/login", post(super::handlers::login))
        .route("/api/auth/logout", post(super::handlers::logout))
        .route("/api/auth/status", get(super::handlers::auth_status))
        .route("/api/health", get(super::handlers::health))
        .nest_service(&video_prefix, video_files)
        .fallback(super::handlers::not_found)
        .method_not_allowed_fallback(super::handlers::method_not_allowed)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            super::middleware::session_cookie,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
