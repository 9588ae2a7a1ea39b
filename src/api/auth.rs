//! Owner identity extractor.
//!
//! Credentials are validated upstream by the authentication gateway, which
//! forwards the authenticated username in a header. This module only reads it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ServiceError;

/// Header carrying the authenticated owner key.
pub const OWNER_HEADER: &str = "x-authenticated-user";

/// Owner key of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedOwner(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedOwner
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
            .map(|owner| AuthenticatedOwner(owner.to_string()))
            .ok_or_else(|| ServiceError::Unauthenticated("Invalid or missing token".to_string()))
    }
}
