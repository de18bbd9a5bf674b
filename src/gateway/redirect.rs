//! Redirect URL construction.
//!
//! Assembles the fixed protocol field set from a [`TransactionRequest`]
//! and the merchant configuration, canonicalizes and signs it, and emits
//! the absolute URL the shopper's web view loads. Construction is
//! synchronous and pure; nothing here talks to the network.

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::domain::TransactionRequest;

use super::{
    canonicalize, params, signature, GatewayConfig, GatewayError, ParameterSet, COMMAND_PAY,
    PROTOCOL_VERSION,
};

/// Timestamp rendering the gateway expects (`yyyyMMddHHmmss`), evaluated
/// in the gateway's own wall-clock zone.
pub fn format_gateway_time(instant: DateTime<FixedOffset>) -> String {
    instant.format("%Y%m%d%H%M%S").to_string()
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::MissingField(field));
    }
    Ok(value)
}

/// Build the parameter set that gets signed. Split out so the callback
/// verifier and tests exercise exactly the field set the URL carries.
pub fn build_parameter_set(
    config: &GatewayConfig,
    request: &TransactionRequest,
) -> Result<ParameterSet, GatewayError> {
    config.validate()?;

    if request.amount == 0 {
        return Err(GatewayError::NonPositiveAmount);
    }
    require(params::TXN_REF, &request.reference_id)?;
    require(params::ORDER_INFO, &request.order_info)?;
    require(params::ORDER_TYPE, &request.order_type)?;

    let locale = request.locale.as_deref().unwrap_or(&config.locale);
    require(params::LOCALE, locale)?;
    require(params::CURR_CODE, &config.currency)?;

    let mut set = ParameterSet::new();
    set.insert(params::VERSION.to_string(), PROTOCOL_VERSION.to_string());
    set.insert(params::COMMAND.to_string(), COMMAND_PAY.to_string());
    set.insert(params::TMN_CODE.to_string(), config.merchant_code.clone());
    set.insert(params::LOCALE.to_string(), locale.to_string());
    set.insert(params::CURR_CODE.to_string(), config.currency.clone());
    set.insert(params::TXN_REF.to_string(), request.reference_id.clone());
    set.insert(params::ORDER_INFO.to_string(), request.order_info.clone());
    set.insert(params::ORDER_TYPE.to_string(), request.order_type.clone());
    set.insert(params::AMOUNT.to_string(), request.amount.to_string());
    set.insert(params::IP_ADDR.to_string(), request.client_ip.to_string());
    set.insert(params::RETURN_URL.to_string(), config.return_url.clone());
    set.insert(
        params::CREATE_DATE.to_string(),
        format_gateway_time(request.created_at),
    );
    set.insert(
        params::EXPIRE_DATE.to_string(),
        format_gateway_time(request.expires_at),
    );

    if let Some(bank_code) = request.bank_code.as_deref() {
        if !bank_code.trim().is_empty() {
            set.insert(params::BANK_CODE.to_string(), bank_code.to_string());
        }
    }

    Ok(set)
}

/// Produce the fully qualified redirect URL. The returned URL's query,
/// when parsed and stripped of the signature field, reproduces exactly the
/// parameter set that was signed.
pub fn build_payment_url(
    config: &GatewayConfig,
    request: &TransactionRequest,
) -> Result<Url, GatewayError> {
    let parameter_set = build_parameter_set(config, request)?;
    let canonical = canonicalize(&parameter_set);
    let signature = signature::sign(&config.secret_key, &canonical)?;

    let raw = format!(
        "{}?{}&{}={}",
        config.pay_url, canonical, params::SECURE_HASH, signature
    );
    Ok(Url::parse(&raw)?)
}
