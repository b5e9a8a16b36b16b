use axum::http::{header::AUTHORIZATION, HeaderMap};
use sha2::{Digest, Sha256};

use crate::errors::AppError;

/// Compares SHA-256 digests of both values with a fixed-length, branch-free fold,
/// so the time taken does not depend on where the values differ.
pub fn secret_matches(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Requires `header` to carry `expected`. An unconfigured secret rejects every call.
pub fn require_header_secret(
    headers: &HeaderMap,
    header: &str,
    expected: Option<&str>,
) -> Result<(), AppError> {
    let provided = headers.get(header).and_then(|v| v.to_str().ok());
    match (provided, expected) {
        (Some(provided), Some(expected)) if secret_matches(provided, expected) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Requires `Authorization: Bearer <expected>`. An unconfigured token rejects every call.
pub fn require_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match (token, expected) {
        (Some(token), Some(expected)) if secret_matches(token, expected) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}
