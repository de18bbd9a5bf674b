use std::env;
use std::fmt;

use anyhow::{Context, Result};
use chrono::{Duration, FixedOffset};
use dotenvy::dotenv;
use ipnet::IpNet;
use url::Url;

use crate::gateway::GatewayConfig;

#[derive(Debug, Clone)]
pub enum AllowedIps {
    Any,
    Cidrs(Vec<IpNet>),
}

#[derive(Clone)]
pub struct Config {
    pub server_port: u16,
    pub merchant_code: String,
    pub secret_key: String,
    pub pay_url: String,
    pub return_url: String,
    pub locale: String,
    pub currency: String,
    pub pay_validity_minutes: i64,
    /// Zone offset the gateway evaluates create/expire dates in, hours
    /// east of UTC. The hosted page runs on Indochina time.
    pub gateway_utc_offset_hours: i32,
    /// Source ranges the IPN endpoint accepts, `*` for any.
    pub allowed_ipn_ips: AllowedIps,
    /// How many proxy hops in front of this service are trusted when
    /// walking X-Forwarded-For.
    pub trusted_proxy_depth: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("merchant_code", &self.merchant_code)
            .field("secret_key", &"****")
            .field("pay_url", &self.pay_url)
            .field("return_url", &self.return_url)
            .field("locale", &self.locale)
            .field("currency", &self.currency)
            .field("pay_validity_minutes", &self.pay_validity_minutes)
            .field("gateway_utc_offset_hours", &self.gateway_utc_offset_hours)
            .field("allowed_ipn_ips", &self.allowed_ipn_ips)
            .field("trusted_proxy_depth", &self.trusted_proxy_depth)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        let merchant_code = env::var("VNP_TMN_CODE").context("VNP_TMN_CODE is required")?;
        let secret_key = env::var("VNP_HASH_SECRET").context("VNP_HASH_SECRET is required")?;
        if merchant_code.trim().is_empty() {
            anyhow::bail!("VNP_TMN_CODE must not be empty");
        }
        if secret_key.is_empty() {
            anyhow::bail!("VNP_HASH_SECRET must not be empty");
        }

        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            merchant_code,
            secret_key,
            pay_url: env::var("VNP_PAY_URL").unwrap_or_else(|_| {
                "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string()
            }),
            return_url: env::var("VNP_RETURN_URL").context("VNP_RETURN_URL is required")?,
            locale: env::var("VNP_LOCALE").unwrap_or_else(|_| "vn".to_string()),
            currency: env::var("VNP_CURR_CODE").unwrap_or_else(|_| "VND".to_string()),
            pay_validity_minutes: env::var("VNP_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            gateway_utc_offset_hours: env::var("VNP_TIME_OFFSET_HOURS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()?,
            allowed_ipn_ips: parse_allowed_ips(
                &env::var("ALLOWED_IPN_IPS").unwrap_or_else(|_| "*".to_string()),
            )?,
            trusted_proxy_depth: env::var("TRUSTED_PROXY_DEPTH")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,
        };

        config.gateway().context("gateway configuration is invalid")?;
        Ok(config)
    }

    /// Derive the read-only gateway settings shared across in-flight
    /// checkout attempts.
    pub fn gateway(&self) -> Result<GatewayConfig> {
        let pay_url = Url::parse(&self.pay_url).context("VNP_PAY_URL is not a valid URL")?;
        if pay_url.query().is_some() {
            anyhow::bail!("VNP_PAY_URL must not carry its own query string");
        }
        Url::parse(&self.return_url).context("VNP_RETURN_URL is not a valid URL")?;

        let gateway_offset = FixedOffset::east_opt(self.gateway_utc_offset_hours * 3600)
            .context("VNP_TIME_OFFSET_HOURS is out of range")?;

        let gateway = GatewayConfig {
            merchant_code: self.merchant_code.clone(),
            secret_key: self.secret_key.clone(),
            pay_url,
            return_url: self.return_url.clone(),
            locale: self.locale.clone(),
            currency: self.currency.clone(),
            validity: Duration::minutes(self.pay_validity_minutes),
            gateway_offset,
        };
        gateway.validate()?;
        Ok(gateway)
    }
}

fn parse_allowed_ips(raw: &str) -> Result<AllowedIps> {
    let value = raw.trim();
    if value == "*" {
        return Ok(AllowedIps::Any);
    }

    let cidrs = value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse::<IpNet>)
        .collect::<Result<Vec<_>, _>>()?;

    if cidrs.is_empty() {
        anyhow::bail!("ALLOWED_IPN_IPS must be '*' or a comma-separated list of CIDRs");
    }

    Ok(AllowedIps::Cidrs(cidrs))
}
