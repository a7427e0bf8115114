use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use cnam_core::{CanonicalKey, normalize};
use tracing::warn;

use crate::error::AppError;

/// Extractor que normaliza el segmento `{number}` a una clave canonica.
///
/// Rechaza con 400 antes de tocar cache o provider.
#[derive(Debug, Clone)]
pub struct Nanp(pub CanonicalKey);

impl<S> FromRequestParts<S> for Nanp
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        match normalize(&raw) {
            Ok(key) => Ok(Nanp(key)),
            Err(e) => {
                warn!(
                    original_did = e.original(),
                    stripped = e.stripped(),
                    "Invalid NANP number"
                );
                Err(AppError::InvalidNumber(e))
            },
        }
    }
}
