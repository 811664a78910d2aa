//! JSON error responses
//!
//! Every failure becomes `{"error": ..., "details"?: ...}`. The status code
//! alone tells the caller which kind of failure it was.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::SheetError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    source: SheetError,
    summary: &'static str,
}

impl ApiError {
    /// Failure while extracting or filling an uploaded workbook.
    pub fn processing(source: SheetError) -> Self {
        Self {
            source,
            summary: "Excel file processing error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.source {
            SheetError::InputMissing | SheetError::NoLabelsFound | SheetError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            SheetError::NotFound => StatusCode::NOT_FOUND,
            SheetError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        if self.source.is_client_error() {
            ErrorBody {
                error: self.source.to_string(),
                details: None,
            }
        } else {
            ErrorBody {
                error: self.summary.to_string(),
                details: Some(self.source.to_string()),
            }
        }
    }
}

impl From<SheetError> for ApiError {
    fn from(source: SheetError) -> Self {
        Self {
            source,
            summary: "Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}: {}", self.summary, self.source);
        } else {
            warn!("Request rejected ({}): {}", status, self.source);
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_have_no_details() {
        let err = ApiError::from(SheetError::InputMissing);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.error, "File was not sent");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_no_labels_is_bad_request() {
        let err = ApiError::processing(SheetError::NoLabelsFound);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.body().error.contains("starting with '@'"));
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = ApiError::from(SheetError::PayloadTooLarge);
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = err.body();
        assert_eq!(body.error, "Uploaded file is too large");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            ApiError::from(SheetError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_processing_errors_carry_details() {
        let err = ApiError::processing(SheetError::NoData);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error, "Excel file processing error");
        assert_eq!(
            body.details.as_deref(),
            Some("No pharmacies found in the database")
        );
    }

    #[test]
    fn test_store_errors_are_server_errors() {
        let err = ApiError::from(SheetError::Store("disk full".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error, "Server Error");
    }

    #[test]
    fn test_body_skips_missing_details() {
        let json = serde_json::to_string(&ApiError::from(SheetError::InvalidId).body()).unwrap();
        assert_eq!(json, r#"{"error":"Invalid ID format"}"#);
    }
}
