//! Lookup endpoint handlers.

use axum::{Json, extract::State};
use cnam_core::LookupResult;
use tracing::instrument;

use crate::extractors::{CorrelationId, Nanp};
use crate::pipeline::LookupOutcome;
use crate::state::AppState;

/// Handler for GET /{number}: cache first, provider on a miss.
#[instrument(skip_all, fields(key = %key, request_id = %request_id))]
pub async fn lookup(
    State(state): State<AppState>,
    Nanp(key): Nanp,
    CorrelationId(request_id): CorrelationId,
) -> Json<LookupResult> {
    let outcome = state.pipeline().lookup(&key, &request_id).await;
    respond(outcome)
}

/// Handler for GET /provider/{number}: skips the cache read.
#[instrument(skip_all, fields(key = %key, request_id = %request_id))]
pub async fn provider_lookup(
    State(state): State<AppState>,
    Nanp(key): Nanp,
    CorrelationId(request_id): CorrelationId,
) -> Json<LookupResult> {
    let outcome = state.pipeline().lookup_provider(&key, &request_id).await;
    respond(outcome)
}

/// Detaches the cache write, if any, and returns the result.
fn respond(outcome: LookupOutcome) -> Json<LookupResult> {
    tracing::debug!(source = ?outcome.source(), "Lookup resolved");

    let (result, pending_write) = outcome.into_parts();
    if let Some(write) = pending_write {
        write.spawn();
    }

    Json(result)
}
