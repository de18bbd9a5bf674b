//! VNPAY hosted-checkout integration: canonical parameter encoding,
//! HMAC-SHA512 signing, redirect URL construction and callback
//! verification.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, FixedOffset};
use thiserror::Error;
use url::Url;

pub mod callback;
pub mod canon;
pub mod redirect;
pub mod signature;

pub use callback::verify_callback;
pub use canon::canonicalize;
pub use redirect::build_payment_url;

/// Flat key/value parameter set, raw (pre-encoding) values only.
/// Encoding is applied during canonicalization, never stored.
pub type ParameterSet = BTreeMap<String, String>;

/// Gateway-defined parameter names. These are wire literals; any deviation
/// breaks interoperability with the hosted payment page.
pub mod params {
    pub const VERSION: &str = "vnp_Version";
    pub const COMMAND: &str = "vnp_Command";
    pub const TMN_CODE: &str = "vnp_TmnCode";
    pub const LOCALE: &str = "vnp_Locale";
    pub const CURR_CODE: &str = "vnp_CurrCode";
    pub const TXN_REF: &str = "vnp_TxnRef";
    pub const ORDER_INFO: &str = "vnp_OrderInfo";
    pub const ORDER_TYPE: &str = "vnp_OrderType";
    pub const AMOUNT: &str = "vnp_Amount";
    pub const BANK_CODE: &str = "vnp_BankCode";
    pub const IP_ADDR: &str = "vnp_IpAddr";
    pub const RETURN_URL: &str = "vnp_ReturnUrl";
    pub const CREATE_DATE: &str = "vnp_CreateDate";
    pub const EXPIRE_DATE: &str = "vnp_ExpireDate";
    pub const RESPONSE_CODE: &str = "vnp_ResponseCode";
    pub const SECURE_HASH: &str = "vnp_SecureHash";
    pub const SECURE_HASH_TYPE: &str = "vnp_SecureHashType";
}

pub const PROTOCOL_VERSION: &str = "2.1.0";
pub const COMMAND_PAY: &str = "pay";
pub const DEFAULT_ORDER_TYPE: &str = "other";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("amount must be a positive number of minor currency units")]
    NonPositiveAmount,

    #[error("gateway secret key is not configured")]
    MissingSecretKey,

    #[error("merchant code is not configured")]
    MissingMerchantCode,

    #[error("gateway URL is invalid: {0}")]
    InvalidGatewayUrl(#[from] url::ParseError),
}

impl GatewayError {
    /// Configuration errors are fatal at integration-setup time and must
    /// not be reported to callers as their own mistake.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingSecretKey
                | GatewayError::MissingMerchantCode
                | GatewayError::InvalidGatewayUrl(_)
        )
    }
}

/// Merchant-side settings for one gateway integration, loaded once at
/// startup and shared read-only.
#[derive(Clone)]
pub struct GatewayConfig {
    pub merchant_code: String,
    pub secret_key: String,
    /// Hosted payment page endpoint. Must not carry its own query string.
    pub pay_url: Url,
    /// Callback endpoint the gateway redirects the shopper back to.
    pub return_url: String,
    pub locale: String,
    pub currency: String,
    /// How long a redirect URL stays payable.
    pub validity: Duration,
    /// Wall-clock zone the gateway evaluates create/expire dates in.
    pub gateway_offset: FixedOffset,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_code", &self.merchant_code)
            .field("secret_key", &"****")
            .field("pay_url", &self.pay_url.as_str())
            .field("return_url", &self.return_url)
            .field("locale", &self.locale)
            .field("currency", &self.currency)
            .field("validity", &self.validity)
            .field("gateway_offset", &self.gateway_offset)
            .finish()
    }
}

impl GatewayConfig {
    /// Rejects settings the integration cannot run with. Called at startup
    /// so a misconfigured deployment fails before it can emit an unsigned
    /// or unsignable URL.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.merchant_code.trim().is_empty() {
            return Err(GatewayError::MissingMerchantCode);
        }
        if self.secret_key.is_empty() {
            return Err(GatewayError::MissingSecretKey);
        }
        if self.return_url.trim().is_empty() {
            return Err(GatewayError::MissingField("return_url"));
        }
        Ok(())
    }
}
