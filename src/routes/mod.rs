// Route exports
pub mod chats;
pub mod profiles;
pub mod search;

use crate::auth::TokenVerifier;
use crate::core::{Directory, Scorer};
use crate::models::ErrorResponse;
use crate::services::{Backend, StoreError};
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use std::sync::Arc;
use thiserror::Error;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory<Backend>>,
    pub scorer: Scorer,
    pub verifier: Arc<TokenVerifier>,
    pub chat_history_limit: usize,
}

impl AppState {
    /// Backend behind the directory, used directly for profile and chat records
    pub fn store(&self) -> &Backend {
        self.directory.store()
    }
}

/// Errors surfaced by HTTP handlers, rendered as [`ErrorResponse`] JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The store failed; the message is the store's own
    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Store(_) => "store_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_conflict() {
            ApiError::Conflict(err.to_string())
        } else {
            tracing::error!("Store operation failed: {}", err);
            ApiError::Store(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid path: {}", err)).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(search::configure)
            .configure(profiles::configure)
            .configure(chats::configure),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_api_error_renders_json() {
        let err = ApiError::Store("Database not found".to_string());
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "store_error");
        assert_eq!(parsed.message, "Database not found");
        assert_eq!(parsed.status_code, 502);
    }

    #[test]
    fn test_validation_status() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
