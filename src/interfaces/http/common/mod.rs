//! Common API response types and error mapping

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub mod validated_json;

pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// Every REST endpoint wraps its payload in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Map a domain error to its HTTP status plus the enveloped message.
pub fn domain_error<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound { .. } | DomainError::UnknownStatus(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::ActiveRentalConflict(_)
        | DomainError::RentalConflict(_)
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::success(42);
        assert!(resp.success);
        assert_eq!(resp.data, Some(42));
        assert!(resp.error.is_none());
    }

    #[test]
    fn error_envelope_skips_data() {
        let resp: ApiResponse<()> = ApiResponse::error("boom");
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("boom"));
    }

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (
                DomainError::not_found("Vehicle", "id", "1"),
                StatusCode::NOT_FOUND,
            ),
            (DomainError::UnknownStatus(9), StatusCode::NOT_FOUND),
            (
                DomainError::InvalidRange {
                    start: chrono::NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                    end: chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::ActiveRentalConflict(1), StatusCode::CONFLICT),
            (DomainError::RentalConflict(1), StatusCode::CONFLICT),
            (
                DomainError::Conflict("exists".into()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Unauthorized("nope".into()),
                StatusCode::UNAUTHORIZED,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = domain_error::<()>(err);
            assert_eq!(status, expected);
        }
    }
}
