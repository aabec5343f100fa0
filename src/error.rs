use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Backend or metadata service unreachable or answered non-2xx
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    /// A newer request of the same kind started before this one resolved
    #[error("Superseded by a newer request")]
    Superseded,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of an external collaborator (backend or metadata API)
    pub fn is_network_failure(&self) -> bool {
        matches!(self, AppError::HttpClient(_) | AppError::NetworkFailure(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ConfirmationRequired(msg) => (StatusCode::CONFLICT, msg),
            AppError::Superseded => (StatusCode::CONFLICT, self.to_string()),
            AppError::NetworkFailure(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
