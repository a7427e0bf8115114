//! Cache cleanup endpoint handler.

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::CleanupQuery;
use crate::handlers::response::CleanupResponse;
use crate::state::AppState;

/// DELETE /cleanup?expire=<timestamp>
/// Borra los registros creados antes de `expire`, o de la ventana por
/// defecto si no se indica.
#[instrument(skip_all, fields(expire = ?query.expire))]
pub async fn cleanup(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<CleanupResponse>, AppError> {
    let expired_at = query
        .expire_at()
        .map_err(AppError::BadRequest)?
        .unwrap_or_else(|| state.store().default_cutoff());

    let affected_rows = state.store().expire(expired_at).await;
    state.pipeline().metrics().record_expired(affected_rows);

    Ok(Json(CleanupResponse::new(expired_at, affected_rows)))
}
