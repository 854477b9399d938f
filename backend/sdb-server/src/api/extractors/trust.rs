//! Axum extractor for the resolved trust context

use crate::ApiError;

use sdb_core::TrustContext;

use axum::{extract::FromRequestParts, http::request::Parts};

/// The trust context the authentication middleware attached to the request
pub struct Trust(pub TrustContext);

impl<S> FromRequestParts<S> for Trust
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TrustContext>()
            .cloned()
            .map(Trust)
            .ok_or_else(|| ApiError::internal("route is not behind the authentication middleware"))
    }
}
