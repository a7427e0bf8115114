//! Cache endpoint handlers.

use axum::{Json, extract::State};
use cnam_core::LookupResult;
use tracing::instrument;

use crate::extractors::Nanp;
use crate::handlers::response::DeleteResponse;
use crate::state::AppState;

/// GET /cache/{number}
/// Solo cache; sin resultado devuelve el resultado desconocido, nunca 404.
#[instrument(skip_all, fields(key = %key))]
pub async fn get_cached(State(state): State<AppState>, Nanp(key): Nanp) -> Json<LookupResult> {
    let outcome = state.pipeline().lookup_cached(&key).await;
    let (result, _) = outcome.into_parts();
    Json(result)
}

/// DELETE /cache/{number}
/// Borra un registro. Responde 200 exista o no.
#[instrument(skip_all, fields(key = %key))]
pub async fn delete_cached(State(state): State<AppState>, Nanp(key): Nanp) -> Json<DeleteResponse> {
    let deleted = state.store().delete(&key).await;

    tracing::info!(deleted = deleted, "Cache entry delete requested");

    Json(DeleteResponse {
        id: key.into(),
        deleted,
    })
}
