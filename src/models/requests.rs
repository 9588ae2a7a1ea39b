//! Request DTOs for the todo API
//!
//! Defines the structure of incoming HTTP request bodies and path values.

use serde::Deserialize;

use crate::error::ServiceError;

/// Request body for creating a todo (POST /todos)
///
/// # Fields
/// - `content`: The todo text; surrounding whitespace is trimmed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub content: Option<String>,
}

impl CreateTodoRequest {
    /// Validates the request and returns the trimmed content.
    pub fn validated_content(&self) -> Result<String, ServiceError> {
        validate_content(self.content.as_deref().unwrap_or_default())
    }
}

/// Trims `raw` and rejects it if nothing is left.
pub fn validate_content(raw: &str) -> Result<String, ServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Todo content is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parses a todo id taken from the request path.
///
/// Only positive integers are accepted.
pub fn parse_item_id(raw: &str) -> Result<u64, ServiceError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ServiceError::InvalidInput("Invalid todo ID".to_string())),
    }
}
