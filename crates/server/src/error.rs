use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_core::GameError;
use serde_json::json;

use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required parameter '{0}'")]
    MissingParam(&'static str),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("No chess engine is configured")]
    EngineUnavailable,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParam(_) | AppError::Game(_) => StatusCode::BAD_REQUEST,
            AppError::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Engine(EngineError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Engine(EngineError::Protocol(_)) => StatusCode::BAD_GATEWAY,
            AppError::Engine(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        // {"detail": "message"}
        let message = self.to_string();

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
