//! The JSON envelope returned by the data API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Every data API response: `{"success": true, "data": ...}` on success and
/// `{"success": false, "error": "..."}` on failure.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Wrap `result` in an [ApiResponse].
pub(crate) fn respond<T: Serialize>(result: Result<T, Error>) -> Response {
    match result {
        Ok(data) => ApiResponse::ok(data).into_response(),
        Err(error) => error.into_api_response(),
    }
}

impl Error {
    /// Convert the error into a failed [ApiResponse] with a matching status code.
    pub(crate) fn into_api_response(self) -> Response {
        let status = match &self {
            Error::NotFound | Error::DeleteMissingAccount | Error::DeleteMissingTransaction => {
                StatusCode::NOT_FOUND
            }
            Error::EmptyName
            | Error::InvalidSum(_)
            | Error::InvalidAccount(_)
            | Error::DuplicateAccountName(_) => StatusCode::BAD_REQUEST,
            Error::AccountNotShown(_) => StatusCode::CONFLICT,
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
