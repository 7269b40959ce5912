use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Failures at the tool-dispatch boundary. Order operations themselves never fail;
/// they report problems inside `OrderResult`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Argumentos inválidos: {0}")]
    InvalidArguments(String),

    #[error("Tool desconocida: {0}")]
    UnknownTool(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::InvalidArguments(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownTool(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::to_string(&ErrorBody {
            error: self.to_string(),
        })
        .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
