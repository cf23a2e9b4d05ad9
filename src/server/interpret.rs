//! Interpretation and dispatch endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::command::types::Action;
use crate::pipeline;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;
use crate::types::{DispatchOutcome, UiSnapshot};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    pub text: String,
    pub snapshot: UiSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterpretResponse {
    pub actions: Vec<Action>,
    pub count: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub text: String,
    /// Omitted snapshots are synthesized from the live stores.
    #[serde(default)]
    pub snapshot: Option<UiSnapshot>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub accepted: usize,
    pub dropped: usize,
}

/// POST /interpret
///
/// Pure interpretation: parse and normalize without touching the channel,
/// for deployments where the channel lives in another process.
#[utoipa::path(
    post,
    path = "/interpret",
    tag = "dispatch",
    request_body = InterpretRequest,
    responses(
        (status = 200, body = InterpretResponse),
        (status = 400, body = ApiErrorResponse),
    )
)]
pub(crate) async fn interpret_message(
    Json(payload): Json<InterpretRequest>,
) -> Json<InterpretResponse> {
    let actions = pipeline::interpret(&payload.text, &payload.snapshot);
    Json(InterpretResponse { count: actions.len(), actions })
}

/// POST /dispatch
///
/// Interpret the message and publish the resulting actions to the local
/// channel. An unrecognized message reports `noRecognizedAction` with no
/// side effects.
#[utoipa::path(
    post,
    path = "/dispatch",
    tag = "dispatch",
    request_body = DispatchRequest,
    responses(
        (status = 200, body = DispatchOutcome),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn dispatch_message(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<DispatchRequest>,
) -> Result<Json<DispatchOutcome>, ApiError> {
    let snapshot = match payload.snapshot {
        Some(snapshot) => snapshot,
        None => state.live_snapshot()?,
    };
    let mut channel = state
        .channel
        .lock()
        .map_err(|_| ApiError::internal("channel lock poisoned"))?;
    let outcome = pipeline::dispatch(&mut channel, &payload.text, &snapshot);
    Ok(Json(outcome))
}

/// POST /actions
///
/// Accept pre-built actions from a remote interpreter. Elements are
/// decoded independently: an undecodable or unknown-domain element is
/// dropped and counted while the rest of the batch is still published.
#[utoipa::path(
    post,
    path = "/actions",
    tag = "dispatch",
    request_body = Vec<Action>,
    responses(
        (status = 200, body = PublishResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn publish_actions(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<Vec<serde_json::Value>>,
) -> Result<Json<PublishResponse>, ApiError> {
    let mut actions = Vec::with_capacity(payload.len());
    let mut dropped = 0usize;
    for raw in payload {
        match serde_json::from_value::<Action>(raw) {
            Ok(action) => actions.push(action),
            Err(error) => {
                tracing::warn!(%error, "undecodable wire action dropped");
                dropped += 1;
            }
        }
    }
    let accepted = actions.len();
    let mut channel = state
        .channel
        .lock()
        .map_err(|_| ApiError::internal("channel lock poisoned"))?;
    channel.publish(actions);
    Ok(Json(PublishResponse { accepted, dropped }))
}
