//! Query-parameter validation for the HTTP layer.
//!
//! The fan-out pipeline trusts its inputs; violations are rejected here
//! with a `400` before any upstream work starts.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Rejection produced when a required query parameter is missing or not a
/// strictly positive integer.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{param} parameter must be an integer")]
    NotAnInteger { param: &'static str },

    #[error("{param} parameter must be a positive integer")]
    NotPositive { param: &'static str },
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Parses `raw` as a strictly positive integer.
///
/// A missing value is treated the same as a non-integer one.
pub fn positive_int(param: &'static str, raw: Option<&str>) -> Result<usize, ValidationError> {
    let value: i64 = raw
        .unwrap_or_default()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger { param })?;

    if value <= 0 {
        return Err(ValidationError::NotPositive { param });
    }

    Ok(value as usize)
}
