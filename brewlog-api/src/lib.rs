//! brewlog-api library - coffee logbook HTTP service
//!
//! REST backend for the brewlog coffee-tasting logbook: session-cookie
//! authentication, per-user coffee collections with filtering and stats,
//! flavor profile questionnaires, and a public cross-user feed.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod config;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Session lifetime in days
    pub session_ttl_days: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, session_ttl_days: i64) -> Self {
        Self { db, session_ttl_days }
    }
}

/// Build application router
///
/// Register/login and the health endpoint are public; everything else
/// requires a valid session cookie.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a session)
    let protected = Router::new()
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/coffees", get(api::coffees::list).post(api::coffees::create))
        .route(
            "/api/coffees/:id",
            get(api::coffees::get_one)
                .put(api::coffees::update)
                .delete(api::coffees::remove),
        )
        .route(
            "/api/coffees/:id/profile",
            get(api::profiles::get_one)
                .post(api::profiles::create)
                .put(api::profiles::update),
        )
        .route("/api/feed", get(api::feed::list))
        .route("/api/feed/:id", get(api::feed::get_one))
        .route("/api/feed/users/:user_id/coffees", get(api::feed::user_coffees))
        .route("/api/stats", get(api::stats::get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session::require_session,
        ));

    // Public routes (no session required)
    let public = Router::new()
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .merge(api::health::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
