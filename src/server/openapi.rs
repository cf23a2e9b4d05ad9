use axum::Json;
use utoipa::OpenApi;

use crate::command::types::{Action, ActionPayload, Command, DateRange, DisplayMode, NavigationTarget};
use crate::server::dashboard::DashboardState;
use crate::server::error::{ApiErrorBody, ApiErrorResponse};
use crate::server::interpret::{
    DispatchRequest, InterpretRequest, InterpretResponse, PublishResponse,
};
use crate::types::{DispatchOutcome, Domain, UiSnapshot};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chartpilot API",
        version = "0.1.0",
        description = "Chat-driven command dispatch for a trading dashboard"
    ),
    paths(
        crate::server::interpret::interpret_message,
        crate::server::interpret::dispatch_message,
        crate::server::interpret::publish_actions,
        crate::server::dashboard::dashboard_state,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Core types
        Domain,
        UiSnapshot,
        Command,
        Action,
        ActionPayload,
        NavigationTarget,
        DateRange,
        DisplayMode,
        DispatchOutcome,
        // Requests/responses
        InterpretRequest,
        InterpretResponse,
        DispatchRequest,
        PublishResponse,
        DashboardState,
    )),
    tags(
        (name = "dispatch", description = "Message interpretation and action publishing"),
        (name = "dashboard", description = "Current dashboard state"),
    )
)]
pub struct ApiDoc;

/// GET /openapi.json
pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_serializes() {
        let json = ApiDoc::openapi().to_pretty_json().expect("serialize spec");
        assert!(json.contains("/dispatch"));
        assert!(json.contains("/actions"));
    }
}
