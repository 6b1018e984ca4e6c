//! Conversions API relay
//!
//! Fire-and-forget for the storefront: always answers HTTP 200 so that an
//! advertising outage never blocks checkout. Failures are logged and
//! reported in the body.

use axum::{Json, body::Bytes, extract::State};
use shared::client::{CapiEventRequest, CapiRelayResponse};
use validator::Validate;

use crate::capi;
use crate::state::AppState;

/// POST /functions/v1/capi-relay
pub async fn relay_event(State(state): State<AppState>, body: Bytes) -> Json<CapiRelayResponse> {
    let req: CapiEventRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!("Conversions relay: invalid payload: {e}");
            return Json(CapiRelayResponse::failed("Invalid event payload"));
        }
    };
    if let Err(e) = req.validate() {
        tracing::warn!("Conversions relay: invalid event: {e}");
        return Json(CapiRelayResponse::failed("Invalid event payload"));
    }

    if !state.capi.is_configured() {
        tracing::debug!(event = %req.event_name, "Conversions relay skipped: not configured");
        return Json(CapiRelayResponse::skipped("Conversions API not configured"));
    }

    let payload = capi::build_payload(
        &req,
        chrono::Utc::now().timestamp(),
        state.capi.test_event_code.as_deref(),
    );

    match capi::send_events(&state.http, &state.capi, &payload).await {
        Ok(_) => {
            tracing::debug!(
                event = %req.event_name,
                event_id = ?req.event_id,
                "Conversions event sent"
            );
            Json(CapiRelayResponse::sent())
        }
        Err(e) => {
            tracing::warn!(event = %req.event_name, "Conversions relay upstream failure: {e}");
            Json(CapiRelayResponse::failed("Upstream delivery failed"))
        }
    }
}
