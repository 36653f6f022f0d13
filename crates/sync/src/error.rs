//! Unified error handling for the sync service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::lightspeed::LightspeedError;
use crate::zoho::ZohoError;

/// Application-level error type for the sync service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Lightspeed API operation failed.
    #[error("Lightspeed error: {0}")]
    Lightspeed(#[from] LightspeedError),

    /// Zoho API operation failed.
    #[error("Zoho error: {0}")]
    Zoho(#[from] ZohoError),

    /// One or both platform catalogs came back empty; the run is aborted.
    #[error("Failed to fetch items from one or both platforms: {0}")]
    EmptyCatalog(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Internal(_) | Self::Lightspeed(_) | Self::Zoho(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Sync request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Lightspeed(_) | Self::Zoho(_) => StatusCode::BAD_GATEWAY,
            Self::EmptyCatalog(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Lightspeed(_) | Self::Zoho(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("no SKUs supplied".to_string());
        assert_eq!(err.to_string(), "Bad request: no SKUs supplied");

        let err = AppError::EmptyCatalog("Lightspeed returned no items".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to fetch items from one or both platforms: Lightspeed returned no items"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::EmptyCatalog("empty".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Zoho(ZohoError::NotFound("account".to_string()))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_vendor_errors_are_masked() {
        let err = AppError::Zoho(ZohoError::AuthenticationFailed(
            "refresh token 12345 rejected".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
