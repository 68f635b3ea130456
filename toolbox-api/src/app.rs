/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use toolbox_api::{app::AppState, config::Config};
/// use toolbox_shared::db::RecordStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = RecordStore::new(&config.store.data_dir);
/// store.init().await?;
///
/// let state = AppState::new(store, config);
/// let app = toolbox_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        rate_limit::{rate_limit_layer, RateLimiter},
        security::SecurityHeadersLayer,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use toolbox_shared::{auth::middleware::create_jwt_middleware, auth::session::SessionStore, db::RecordStore};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// JSON bodies above this size are rejected with 413
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// JSON-file record store
    pub store: RecordStore,

    /// Login sessions
    pub sessions: SessionStore,

    /// Per-IP request buckets
    pub rate_limiter: RateLimiter,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: RecordStore, config: Config) -> Self {
        Self {
            store,
            sessions: SessionStore::new(&config.auth.session_secret),
            rate_limiter: RateLimiter::new(config.api.rate_limit_per_minute),
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/
///     ├── GET /status
///     ├── /auth/
///     │   ├── POST /register
///     │   ├── POST /login
///     │   ├── POST /logout
///     │   └── GET  /me                      (token)
///     ├── /tools/
///     │   ├── GET    /
///     │   ├── GET    /:tool_id
///     │   ├── POST   /:tool_id/generate     (token)
///     │   ├── POST   /:tool_id/translate    (token)
///     │   └── POST|DELETE /:tool_id/favorite (token)
///     └── /user/                            (token)
///         ├── GET  /stats
///         ├── GET  /favorites
///         ├── GET  /usage-history
///         ├── PUT  /profile
///         ├── GET  /timeline
///         ├── POST /feedback
///         └── GET  /recommendations
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. CORS
/// 3. Logging (tower-http TraceLayer)
/// 4. Rate limiting (per client IP)
/// 5. Body size limit
/// 6. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let jwt_layer = || axum::middleware::from_fn(create_jwt_middleware(state.jwt_secret().to_string()));

    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route_layer(jwt_layer())
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let tool_routes = Router::new()
        .route("/:tool_id/generate", post(routes::tools::generate))
        .route("/:tool_id/translate", post(routes::tools::translate))
        .route(
            "/:tool_id/favorite",
            post(routes::tools::add_favorite).delete(routes::tools::remove_favorite),
        )
        .route_layer(jwt_layer())
        .route("/", get(routes::tools::list_tools))
        .route("/:tool_id", get(routes::tools::get_tool));

    let user_routes = Router::new()
        .route("/stats", get(routes::user::stats))
        .route("/favorites", get(routes::user::favorites))
        .route("/usage-history", get(routes::user::usage_history))
        .route("/profile", put(routes::user::update_profile))
        .route("/timeline", get(routes::user::timeline))
        .route("/feedback", post(routes::user::submit_feedback))
        .route("/recommendations", get(routes::user::recommendations))
        .route_layer(jwt_layer());

    let api_routes = Router::new()
        .route("/status", get(routes::health::api_status))
        .nest("/auth", auth_routes)
        .nest("/tools", tool_routes)
        .nest("/user", user_routes);

    let origins: Vec<HeaderValue> = state
        .config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
