//! Health, metrics and the static file hit counter.

use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

/// `GET /api/healthz`
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// `GET /admin/metrics`
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    \
         <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.hits()
    ))
}

/// `POST /admin/reset`
pub async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.reset_hits();
    tracing::info!("Reset file server hit counter");
    (StatusCode::OK, "Hits reset to 0")
}

/// Middleware counting every request that reaches the static file server.
pub async fn count_hit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.record_hit();
    next.run(request).await
}
