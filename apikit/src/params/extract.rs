//! Axum extractor for [`Meta`]

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{Meta, Values};
use crate::error::Error;

impl<S> FromRequestParts<S> for Meta
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let values = Values::parse(query)?;
        tracing::trace!(params = values.len(), "extracted request parameters");
        Ok(Meta::new(values))
    }
}
