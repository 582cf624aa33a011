//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::response::ApiError;

/// Raw `{sessionId}` path segment
///
/// Format checks happen in the registry service so that a malformed id maps
/// to the same error whichever route received it.
#[derive(Debug, Clone)]
pub struct SessionIdPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(session_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(SessionIdPath(session_id))
    }
}
