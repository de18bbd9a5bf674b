//! Payment domain entities.
//! Framework-agnostic representation of one outbound payment attempt and
//! the verified outcome of its callback.

use std::net::IpAddr;

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use utoipa::ToSchema;

/// One outbound payment attempt. Created at place-order time, consumed
/// once to build a redirect URL, never mutated afterwards. Not persisted
/// here; order storage is the caller's concern.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    /// Merchant-assigned identifier, unique per attempt. Retries get a
    /// fresh one; reusing a reference id collides in the gateway's
    /// transaction namespace.
    pub reference_id: String,
    /// Amount in minor currency units (order total x 100).
    pub amount: u64,
    pub order_info: String,
    pub order_type: String,
    /// Preselects a payment method on the hosted page when present.
    pub bank_code: Option<String>,
    /// Overrides the configured display locale when present.
    pub locale: Option<String>,
    pub client_ip: IpAddr,
    pub created_at: DateTime<FixedOffset>,
    pub expires_at: DateTime<FixedOffset>,
}

impl TransactionRequest {
    pub fn new(
        reference_id: String,
        amount: u64,
        order_info: String,
        client_ip: IpAddr,
        created_at: DateTime<FixedOffset>,
        validity: Duration,
    ) -> Self {
        Self {
            reference_id,
            amount,
            order_info,
            order_type: crate::gateway::DEFAULT_ORDER_TYPE.to_string(),
            bank_code: None,
            locale: None,
            client_ip,
            created_at,
            expires_at: created_at + validity,
        }
    }
}

/// Classified gateway outcome, derived from the response code alone.
/// Whether the transaction may be trusted is a separate question answered
/// by [`CallbackResult::authentic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Approved,
    Cancelled,
    Declined,
}

/// Result of verifying one inbound gateway callback. Produced once per
/// callback and handed straight to order finalization; never cached or
/// retried.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallbackResult {
    /// True iff the recomputed signature matches the received one.
    pub authentic: bool,
    pub response_code: Option<String>,
    /// Echo of the originating request's reference id, used to correlate
    /// with the pending order.
    pub reference_id: Option<String>,
    pub outcome: PaymentOutcome,
}

impl CallbackResult {
    /// An order may only be marked paid off the back of a callback that is
    /// both authentic and approved.
    pub fn is_confirmed_payment(&self) -> bool {
        self.authentic && self.outcome == PaymentOutcome::Approved
    }
}
