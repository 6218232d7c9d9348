use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use handover_core::validation::{FieldError, ValidationError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(ValidationError),
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl From<handover_core::Error> for AppError {
    fn from(error: handover_core::Error) -> Self {
        match error {
            handover_core::Error::Validation(error) => Self::Validation(error),
            handover_core::Error::NotFound(_) => Self::NotFound("Asset not found.".to_string()),
            handover_core::Error::Parse(error) => Self::BadRequest(error.to_string()),
            handover_core::Error::InvalidInput(message) => Self::BadRequest(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid payload: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            Self::Validation(error) => ErrorBody {
                message: error.to_string(),
                fields: Some(error.fields),
            },
            Self::Internal(detail) => {
                tracing::error!("Request failed: {detail}");
                ErrorBody {
                    message: "Internal server error.".to_string(),
                    fields: None,
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                fields: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
