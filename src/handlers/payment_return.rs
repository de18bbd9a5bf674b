use axum::{
    Json,
    extract::{RawQuery, State},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PaymentOutcome;
use crate::gateway::callback::{describe_response_code, verify_callback};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentReturnResponse {
    pub authentic: bool,
    pub reference_id: Option<String>,
    pub outcome: PaymentOutcome,
    /// Generic user-facing text; never carries signature or crypto detail.
    pub message: String,
}

/// Shopper-facing redirect back from the hosted payment page. Runs the
/// callback verifier and reports a generic outcome; order finalization
/// happens elsewhere, keyed on the reference id.
#[utoipa::path(
    get,
    path = "/payments/vnpay/return",
    responses(
        (status = 200, description = "Callback inspected", body = PaymentReturnResponse)
    ),
    tag = "Payments"
)]
pub async fn payment_return(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let raw_query = query.unwrap_or_default();
    let result = verify_callback(&state.gateway, &raw_query);

    if result.authentic {
        tracing::info!(
            reference_id = result.reference_id.as_deref().unwrap_or("<none>"),
            response_code = result.response_code.as_deref().unwrap_or("<none>"),
            detail = result
                .response_code
                .as_deref()
                .map(describe_response_code)
                .unwrap_or("missing response code"),
            "verified gateway return"
        );
    }

    let message = if result.is_confirmed_payment() {
        "Payment recorded. Your order is being processed.".to_string()
    } else if result.authentic && result.outcome == PaymentOutcome::Cancelled {
        "Payment was cancelled.".to_string()
    } else {
        "Payment was not completed. Please try again or contact support.".to_string()
    };

    Json(PaymentReturnResponse {
        authentic: result.authentic,
        reference_id: result.reference_id,
        outcome: result.outcome,
        message,
    })
}
