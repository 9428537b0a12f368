pub mod clock;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod recorder;
pub mod session;
pub mod source;
pub mod srs;
pub mod state;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the JSON API router
pub fn app(state: AppState) -> Router {
  Router::new()
    .route("/due", get(handlers::due_summary))
    .route("/session", get(handlers::get_session))
    .route("/session/start", post(handlers::start_session))
    .route("/session/flip", post(handlers::flip))
    .route("/session/grade", post(handlers::grade))
    .route("/session/answer", post(handlers::answer))
    .route("/session/next", post(handlers::next))
    .route("/session/retry", post(handlers::retry))
    .route("/session/reconfigure", post(handlers::reconfigure))
    .route("/session/exit", post(handlers::exit_session))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
