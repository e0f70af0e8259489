//! Error types for the valuation engine.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Valuation engine errors.
///
/// All variants are local and recoverable. The engine never returns NaN or
/// infinity in place of one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValuationError {
    #[error("Invalid assumption: {field} {reason}")]
    InvalidAssumption { field: String, reason: String },

    #[error("Degenerate model: {0}")]
    ModelDegenerate(String),

    #[error("Incomplete questionnaire: missing answers for questions {missing:?}")]
    IncompleteQuestionnaire { missing: Vec<u32> },

    #[error("Invalid response for question {question_id}: {reason}")]
    InvalidResponse { question_id: u32, reason: String },

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ValuationError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAssumption {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAssumption { .. } => "INVALID_ASSUMPTION",
            Self::ModelDegenerate(_) => "MODEL_DEGENERATE",
            Self::IncompleteQuestionnaire { .. } => "INCOMPLETE_QUESTIONNAIRE",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
            Self::DivisionByZero(_) => "DIVISION_BY_ZERO",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAssumption { .. }
            | Self::IncompleteQuestionnaire { .. }
            | Self::InvalidResponse { .. } => StatusCode::BAD_REQUEST,
            Self::ModelDegenerate(_) | Self::DivisionByZero(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ValuationError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": ApiError {
                code: self.code().to_string(),
                message: self.to_string(),
            }
        });

        (self.status(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValuationError::invalid("projection_years", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid assumption: projection_years must be at least 1"
        );

        let err = ValuationError::IncompleteQuestionnaire { missing: vec![3, 7] };
        assert_eq!(
            err.to_string(),
            "Incomplete questionnaire: missing answers for questions [3, 7]"
        );
    }

    #[test]
    fn test_error_into_response() {
        let response = ValuationError::ModelDegenerate("r <= g".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = ValuationError::invalid("discount_rate", "must be positive").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ValuationError::DivisionByZero("price".into()).code(),
            "DIVISION_BY_ZERO"
        );
        assert_eq!(
            ValuationError::InvalidResponse {
                question_id: 1,
                reason: "score 4".into()
            }
            .code(),
            "INVALID_RESPONSE"
        );
    }
}
