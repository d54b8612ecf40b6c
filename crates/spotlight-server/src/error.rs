use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use spotlight_core::SpotlightError;

// ---------------------------------------------------------------------------
// ApiResponse: the `{success, message}` envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<SpotlightError>() {
            match e {
                SpotlightError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                SpotlightError::InvalidProductName(_) => StatusCode::BAD_REQUEST,
                SpotlightError::NotInitialized
                | SpotlightError::InvalidConfig(_)
                | SpotlightError::Catalog(_)
                | SpotlightError::Store(_)
                | SpotlightError::Io(_)
                | SpotlightError::Yaml(_)
                | SpotlightError::Json(_)
                | SpotlightError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        tracing::error!(status = %status, error = %self.0, "request failed");
        let body = ApiResponse::failure(self.0.to_string());
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
