use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::HeaderMap,
    response::IntoResponse,
};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::TransactionRequest;
use crate::error::AppError;
use crate::gateway::{build_payment_url, redirect::format_gateway_time};
use crate::utils::client_ip;
use crate::validation;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Order total in major currency units (đồng for VND).
    #[schema(value_type = String, example = "150000")]
    pub amount: BigDecimal,
    pub order_info: String,
    /// Caller-assigned reference id. Must be unique per attempt; one is
    /// generated when omitted.
    pub reference_id: Option<String>,
    /// Preselected payment method on the hosted page, e.g. "NCB".
    pub bank_code: Option<String>,
    /// Display locale override ("vn" or "en").
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Signed redirect URL for the shopper's web view.
    pub payment_url: String,
    pub reference_id: String,
    /// Gateway-local expiry, `yyyyMMddHHmmss`.
    pub expires_at: String,
}

/// One reference id per attempt; a retried payment must get a fresh one
/// so it cannot collide in the gateway's transaction namespace.
fn new_reference_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[utoipa::path(
    post,
    path = "/payments/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Signed redirect URL built", body = CheckoutResponse),
        (status = 400, description = "Invalid order data"),
        (status = 500, description = "Gateway integration misconfigured")
    ),
    tag = "Payments"
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_positive_amount(&payload.amount)?;

    let order_info = validation::sanitize_string(&payload.order_info);
    validation::validate_order_info(&order_info)?;

    let bank_code = match payload.bank_code.as_deref() {
        Some(raw) => {
            let bank_code = validation::sanitize_string(raw);
            validation::validate_bank_code(&bank_code)?;
            Some(bank_code)
        }
        None => None,
    };
    if let Some(locale) = payload.locale.as_deref() {
        validation::validate_locale(locale)?;
    }

    // Scale into minor units; the gateway's amount field is the order
    // total x 100.
    let scaled = (&payload.amount * BigDecimal::from(100)).round(0);
    let amount_minor = scaled
        .to_u64()
        .ok_or_else(|| AppError::Validation("amount: out of range".to_string()))?;

    let client_ip = client_ip::from_forwarded_headers(&headers, state.config.trusted_proxy_depth)
        .or_else(|| connect_info.map(|info| info.0.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    let now = Utc::now().with_timezone(&state.gateway.gateway_offset);
    let reference_id = match payload.reference_id.as_deref() {
        Some(raw) => {
            let reference_id = validation::sanitize_string(raw);
            validation::validate_reference_id(&reference_id)?;
            reference_id
        }
        None => new_reference_id(&now.format("%Y%m%d").to_string()),
    };
    let mut request = TransactionRequest::new(
        reference_id,
        amount_minor,
        order_info,
        client_ip,
        now,
        state.gateway.validity,
    );
    request.bank_code = bank_code;
    request.locale = payload.locale;

    let payment_url = build_payment_url(&state.gateway, &request)?;

    // The URL itself carries the signature, so only the correlation
    // fields are logged.
    tracing::info!(
        reference_id = %request.reference_id,
        amount_minor,
        client_ip = %client_ip,
        "built payment redirect URL"
    );

    Ok(Json(CheckoutResponse {
        payment_url: payment_url.to_string(),
        reference_id: request.reference_id,
        expires_at: format_gateway_time(request.expires_at),
    }))
}
