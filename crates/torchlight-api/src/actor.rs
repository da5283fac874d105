//! Caller identity.
//!
//! Authentication happens upstream; the identity layer forwards the
//! authenticated participant id in the `x-actor-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use torchlight_core::error::DomainError;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated participant id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The participant making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(ACTOR_HEADER).ok_or_else(|| {
            ApiError(DomainError::Forbidden(format!(
                "missing {ACTOR_HEADER} header"
            )))
        })?;

        value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(Actor)
            .ok_or_else(|| {
                ApiError(DomainError::Forbidden(format!(
                    "{ACTOR_HEADER} must be a participant id"
                )))
            })
    }
}
