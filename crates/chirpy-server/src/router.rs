//! Router assembly for the chirpy HTTP API.
//!
//! [`build_router`] wires every handler to its route, mounts the static file
//! server under `/app`, and adds CORS and tracing layers.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds the complete router.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS allows any origin and
/// header, and answers preflight requests itself.
pub fn build_router(state: AppState) -> Router {
    let static_files = Router::new()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::admin::count_hit,
        ));

    Router::new()
        // Static site
        .nest("/app", static_files)
        // Admin
        .route("/admin/metrics", get(handlers::admin::metrics))
        .route("/admin/reset", post(handlers::admin::reset))
        .route("/api/healthz", get(handlers::admin::healthz))
        // Chirps
        .route(
            "/api/validate_chirp",
            post(handlers::chirps::validate_chirp),
        )
        .route(
            "/api/chirps",
            get(handlers::chirps::list_chirps).post(handlers::chirps::create_chirp),
        )
        .route(
            "/api/chirps/{chirp_id}",
            get(handlers::chirps::get_chirp).delete(handlers::chirps::delete_chirp),
        )
        // Accounts and tokens
        .route(
            "/api/users",
            post(handlers::users::create_user).put(handlers::users::update_user),
        )
        .route("/api/login", post(handlers::auth::login))
        .route("/api/refresh", post(handlers::auth::refresh))
        .route("/api/revoke", post(handlers::auth::revoke))
        // Payment provider
        .route("/api/polka/webhooks", post(handlers::webhooks::polka))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers(Any)
}
