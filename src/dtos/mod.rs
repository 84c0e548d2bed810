pub mod post_dtos;
pub mod user_dtos;

pub use post_dtos::PostInput;
pub use user_dtos::UserInput;

use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// Decodes a request body; any JSON problem is the caller's fault.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}
