//! HTTP mapping of `AppError` and the catch-all responses.

use crate::errors::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::any::Any;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::MalformedPayload(_)
            | AppError::BadRequest(_)
            | AppError::InvalidDate(_)
            | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::AuthRequired | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": "Validation failed",
                "fields": fields,
            }),
            AppError::MalformedPayload(detail) => {
                tracing::debug!(%detail, "rejected request body");
                json!({ "error": "Malformed JSON body" })
            }
            AppError::InvalidCredentials => json!({
                "success": false,
                "message": self.to_string(),
            }),
            AppError::BadRequest(_)
            | AppError::InvalidDate(_)
            | AppError::Conflict(_)
            | AppError::AuthRequired
            | AppError::Forbidden(_)
            | AppError::NotFound(_) => json!({ "error": self.to_string() }),
            // Never leak internals to the client
            _ => {
                tracing::error!(error = %self, "request failed");
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
}

/// Response for a handler that panicked.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(%detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldErrors;

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::Validation(FieldErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AuthRequired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Other("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
