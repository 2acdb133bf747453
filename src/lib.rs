pub mod error;
pub mod handlers;
pub mod sessions;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::SharedState;
use tower_http::trace::TraceLayer;

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/search", post(handlers::search))
        .route("/sessions/:id/scroll", post(handlers::scroll))
        .route("/favorites", get(handlers::favorites))
        .layer(TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any) // In production, specific origin should be used
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
