use crate::error::AppError;
use crate::models::OwnerId;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// Header carrying the caller's owner ID, set by the upstream auth layer
pub const OWNER_HEADER: &str = "x-owner-id";

/// The owner on whose behalf a request runs.
///
/// Session issuance happens upstream; this extractor only trusts the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedOwner(pub OwnerId);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_owner_id(&parts.headers)
            .map(AuthenticatedOwner)
            .map_err(|message| {
                tracing::warn!(path = %parts.uri.path(), error = %message, "Rejected request: no owner identity");
                AppError::Authentication(message.to_string())
            })
    }
}

fn extract_owner_id(headers: &HeaderMap) -> Result<OwnerId, &'static str> {
    let raw = headers
        .get(OWNER_HEADER)
        .ok_or("Missing required header: X-Owner-Id")?
        .to_str()
        .map_err(|_| "Invalid X-Owner-Id header: not valid UTF-8")?;

    raw.trim()
        .parse::<OwnerId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or("X-Owner-Id must be a positive integer")
}
