use axum::http::header::ALLOW;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use hitcounter_core::{CoreError, ParamsError};

/// Methods the handler answers.
pub const ALLOWED_METHODS: &str = "GET, POST";

/// API error types with JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// Anything other than GET or POST.
    MethodNotSupported(Method),
    /// Unparsable parameters or body.
    BadRequest(String),
    /// The hits table could not be read or written.
    StoreUnavailable,
    /// Internal server error.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MethodNotSupported(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method {method} is not supported"),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Hit store unavailable".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = serde_json::json!({ "error": message });
        let mut response = (status, axum::Json(body)).into_response();
        if let ApiError::MethodNotSupported(_) = self {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        tracing::error!("Core error: {err}");
        if err.is_store_failure() {
            ApiError::StoreUnavailable
        } else {
            ApiError::Internal
        }
    }
}

impl From<ParamsError> for ApiError {
    fn from(err: ParamsError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
