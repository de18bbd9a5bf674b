use axum::{
    Json,
    extract::{RawQuery, State},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::gateway::callback::{describe_response_code, verify_callback};
use crate::AppState;

/// Acknowledgement body the gateway expects from the IPN endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct IpnResponse {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl IpnResponse {
    fn new(rsp_code: &str, message: &str) -> Self {
        Self {
            rsp_code: rsp_code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Server-to-server confirmation channel. The gateway retries until it
/// receives a well-formed acknowledgement, so every path answers 200 with
/// a gateway-defined response code rather than an HTTP error.
#[utoipa::path(
    get,
    path = "/payments/vnpay/ipn",
    responses(
        (status = 200, description = "Acknowledgement for the gateway", body = IpnResponse)
    ),
    tag = "Payments"
)]
pub async fn ipn(State(state): State<AppState>, RawQuery(query): RawQuery) -> impl IntoResponse {
    let Some(raw_query) = query else {
        return Json(IpnResponse::new("99", "Missing callback data"));
    };

    let result = verify_callback(&state.gateway, &raw_query);

    if !result.authentic {
        return Json(IpnResponse::new("97", "Invalid signature"));
    }

    let Some(reference_id) = result.reference_id.as_deref() else {
        return Json(IpnResponse::new("99", "Missing transaction reference"));
    };

    tracing::info!(
        reference_id,
        response_code = result.response_code.as_deref().unwrap_or("<none>"),
        detail = result
            .response_code
            .as_deref()
            .map(describe_response_code)
            .unwrap_or("missing response code"),
        outcome = ?result.outcome,
        "verified gateway IPN"
    );

    Json(IpnResponse::new("00", "Confirm Success"))
}
