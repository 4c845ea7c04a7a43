use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use campus_auth::AccessError;

/// Access failure as an HTTP response.
///
/// `NotFound` renders the same body whether the row is missing or hidden.
#[derive(Debug)]
pub struct ApiError(pub AccessError);

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AccessError::Unauthenticated => {
                json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in to continue")
            }
            AccessError::Forbidden(denial) => {
                json_error(StatusCode::FORBIDDEN, "forbidden", denial.to_string())
            }
            AccessError::NotFound => not_found(),
        }
    }
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
