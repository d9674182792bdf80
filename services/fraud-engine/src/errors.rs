use actix_web::{
    error::{JsonPayloadError, QueryPayloadError, ResponseError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FraudEngineError>;

#[derive(Error, Debug)]
pub enum FraudEngineError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for FraudEngineError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "type": self.error_type()
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            FraudEngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FraudEngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FraudEngineError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            FraudEngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl FraudEngineError {
    fn error_type(&self) -> &str {
        match self {
            FraudEngineError::Database(_) => "database_error",
            FraudEngineError::Validation(_) => "validation_error",
            FraudEngineError::InvalidPayload(_) => "invalid_payload",
            FraudEngineError::Internal(_) => "internal_error",
        }
    }
}

/// Maps JSON extractor failures onto the service error body.
///
/// Schema violations keep serde's message, which names the offending field.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected request body");

    let error = match err {
        JsonPayloadError::Deserialize(e) => FraudEngineError::Validation(e.to_string()),
        other => FraudEngineError::InvalidPayload(other.to_string()),
    };
    error.into()
}

/// Maps query string failures (e.g. `?limit=abc`) onto the service error body.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected query string");

    FraudEngineError::InvalidPayload(err.to_string()).into()
}
