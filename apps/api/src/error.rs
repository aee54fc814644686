use async_graphql::ErrorExtensions;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marquee_core::{AppError, AppResult};
use serde::Serialize;
use tracing::error;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
    code: &'static str,
}

/// API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Machine-readable code sent to clients with the message.
    pub fn code(&self) -> &'static str {
        match self.0 {
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unauthorized(_) => "SECURITY_NOT_AUTHENTICATED",
            AppError::Forbidden(_) => "SECURITY_NOT_AUTHORIZED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn log_internal(&self) {
        if let AppError::Internal(message) = &self.0 {
            error!(%message, "request failed");
        }
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
            code: self.code(),
        });

        (status, payload).into_response()
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        self.log_internal();
        let code = self.code();
        async_graphql::Error::new(self.0.to_string()).extend_with(|_, extensions| {
            extensions.set("code", code);
        })
    }
}

/// Converts service results into GraphQL resolver results.
pub trait GraphqlResultExt<T> {
    /// Maps the error into a GraphQL error carrying `extensions.code`.
    fn into_graphql(self) -> async_graphql::Result<T>;
}

impl<T> GraphqlResultExt<T> for AppResult<T> {
    fn into_graphql(self) -> async_graphql::Result<T> {
        self.map_err(|error| ApiError(error).extend())
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
