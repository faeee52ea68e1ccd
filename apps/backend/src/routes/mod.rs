pub mod auth;
pub mod grammar;
pub mod reviews;
pub mod sets;
pub mod settings;
pub mod user;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

/// Parse a JSON body that may be absent; an empty body yields the default.
pub(crate) fn parse_optional_json<T>(body: &Bytes) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::Parse(format!("Invalid JSON body: {}", e)))
}

/// Parse a required JSON body, reporting bad input as a 400 parse error.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Parse(format!("Invalid JSON body: {}", e)))
}
