use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::FieldError;
use crate::services::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    AvailabilityConflict(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Busy(String),

    #[error("{0}")]
    Upstream(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn validation(field: crate::models::FieldName, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::AvailabilityConflict(_)
                | AppError::Network(_)
                | AppError::Auth(_)
                | AppError::Upstream(_)
        )
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Network(msg) => AppError::Network(msg),
            ApiError::Unauthorized => AppError::Auth("Unauthorized request".to_string()),
            ApiError::NotFound(msg) => AppError::NotFound(msg),
            ApiError::Rejected { message, .. } => AppError::Upstream(message),
            ApiError::Decode(msg) => AppError::Upstream(format!("unexpected response: {msg}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AvailabilityConflict(_) => StatusCode::CONFLICT,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Busy(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let mut body = serde_json::json!({ "error": self.to_string() });
        match &self {
            AppError::Validation(errors) => {
                body["fields"] = serde_json::to_value(errors).unwrap_or_default();
                body["firstInvalidField"] = errors
                    .first()
                    .map(|e| serde_json::json!(e.field.as_str()))
                    .unwrap_or_default();
            }
            AppError::Auth(_) => {
                body["redirect"] = serde_json::json!("/login");
            }
            _ => {}
        }
        (status, axum::Json(body)).into_response()
    }
}
