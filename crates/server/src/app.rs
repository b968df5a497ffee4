use axum::{
    middleware,
    routing::get,
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::middleware::log_requests;
use crate::routes;
use crate::routes::game::Engine;

/// Build the application router. The engine session, if any, is shared by
/// every request through an extension.
pub fn router(config: Config, engine: Engine) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index::index))
        .route("/health", get(routes::health::health_check))
        .route(
            "/game",
            get(routes::game::get_game)
                .post(routes::game::new_game)
                .put(routes::game::play_move),
        )
        .layer(Extension(engine))
        .layer(Extension(config))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}
