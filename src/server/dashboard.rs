//! Read side: the state the dashboard should currently be showing.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub page: String,
    pub date_range: String,
    pub display_mode: String,
}

/// GET /state
#[utoipa::path(
    get,
    path = "/state",
    tag = "dashboard",
    responses(
        (status = 200, body = DashboardState),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn dashboard_state(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<DashboardState>, ApiError> {
    let snapshot = state.live_snapshot()?;
    Ok(Json(DashboardState {
        page: snapshot.page,
        date_range: snapshot.date_range,
        display_mode: snapshot.display_mode,
    }))
}
