//! API error responses shared by all handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use ts_rs::TS;

/// Machine-readable error codes surfaced to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ApiErrorCode {
    UnknownGenre,
    UnknownArtist,
    Internal,
}

impl ApiErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ApiErrorCode::UnknownGenre | ApiErrorCode::UnknownArtist => StatusCode::NOT_FOUND,
            ApiErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_genre(slug: &str) -> Self {
        Self::new(ApiErrorCode::UnknownGenre, format!("No genre '{slug}'"))
    }

    pub fn unknown_artist(slug: &str) -> Self {
        Self::new(ApiErrorCode::UnknownArtist, format!("No artist '{slug}'"))
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Map a data-source failure to a generic 500, logging the real cause.
///
/// The underlying error never reaches the response body.
pub fn db_error(context: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!(error = %err, "{context} failed");
    ApiError::new(ApiErrorCode::Internal, "Internal server error")
}

#[derive(Serialize, TS)]
#[ts(export)]
struct ErrorBody {
    code: ApiErrorCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes_map_to_404() {
        assert_eq!(
            ApiError::unknown_genre("jazz").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::unknown_artist("nina").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn db_error_hides_the_cause() {
        let err = db_error("Genre listing", "connection refused");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
