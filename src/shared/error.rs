use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Unknown email and wrong password are deliberately the same outcome
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Inactive account")]
    InactiveAccount,
    /// Expired, malformed, unknown and already-consumed tokens all land here
    #[error("Invalid token")]
    InvalidToken,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Email delivery error: {0}")]
    EmailDeliveryError(#[source] anyhow::Error),
    #[error("Store error: {0}")]
    StoreError(#[source] anyhow::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InactiveAccount | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::EmailDeliveryError(_) => StatusCode::BAD_GATEWAY,
            AppError::StoreError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error document returned by every failing endpoint
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorObject {
    pub status: u16,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AppError::ValidationError(msg) => msg,
            AppError::InvalidCredentials => "Incorrect email or password".to_string(),
            AppError::InactiveAccount => "Inactive user".to_string(),
            AppError::InvalidToken => "Could not validate credentials".to_string(),
            AppError::Forbidden(msg) => msg,
            AppError::NotFound => "Resource not found".to_string(),
            AppError::Conflict(msg) => msg,
            AppError::EmailDeliveryError(e) => {
                tracing::error!("Email delivery error: {:?}", e);
                "Failed to send email".to_string()
            }
            AppError::StoreError(e) => {
                tracing::error!("Store error: {:?}", e);
                "Service temporarily unavailable".to_string()
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                "Internal server error".to_string()
            }
        };

        let body = ErrorResponse {
            errors: vec![ErrorObject {
                status: status.as_u16(),
                detail,
            }],
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
