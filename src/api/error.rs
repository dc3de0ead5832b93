//! API error types with structured JSON responses.
//!
//! Bodies look like `{"error": {"code": "PLAN_NOT_FOUND", "message": "..."}}`. Internal
//! failures are logged here and reported with a generic message.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `x-user-id` header was missing or empty.
    #[error("Authentication required")]
    Unauthorized,
    /// A path or body value could not be interpreted.
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// A failure from the planning core.
    #[error(transparent)]
    Domain(#[from] Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                self.to_string(),
            ),
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone()),
            Self::Domain(err) => match err {
                Error::NoCandidates => (StatusCode::NOT_FOUND, "NO_CANDIDATES", err.to_string()),
                Error::NoFeasibleMeals => {
                    (StatusCode::NOT_FOUND, "NO_FEASIBLE_MEALS", err.to_string())
                }
                Error::PlanNotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    "PLAN_NOT_FOUND",
                    "Meal plan not found".to_string(),
                ),
                Error::ConstraintsNotFound => (
                    StatusCode::NOT_FOUND,
                    "CONSTRAINTS_NOT_FOUND",
                    err.to_string(),
                ),
                Error::InvalidInput { message } => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", message.clone())
                }
                _ => {
                    error!(error = %err, "API internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}
