use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::middleware::{REQUEST_ID_HEADER, RequestId};

/// Extractor del correlation id de la request.
///
/// Lo deja `RequestIdLayer` en las extensions; sin la capa se lee el header
/// o se genera uno nuevo.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<RequestId>() {
            return Ok(CorrelationId(id.as_str().to_string()));
        }

        let id = parts
            .headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(CorrelationId(id))
    }
}
