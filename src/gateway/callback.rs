//! Inbound callback verification.
//!
//! The gateway redirects the shopper back (and separately calls the IPN
//! endpoint) with the same parameter space plus a response code and a
//! signature. Verification recomputes the signature over every received
//! field except the two hash fields and compares it to the received one.
//! A tampered, truncated or unsigned callback is a terminal
//! `authentic = false` outcome, never an error: a single malformed
//! callback must not crash the handling path.

use url::form_urlencoded;

use crate::domain::{CallbackResult, PaymentOutcome};

use super::{canonicalize, params, signature, GatewayConfig, ParameterSet};

/// Published response codes and their classification. New codes are
/// one-line additions; anything unlisted classifies as declined.
const RESPONSE_CODES: &[(&str, PaymentOutcome, &str)] = &[
    ("00", PaymentOutcome::Approved, "transaction successful"),
    ("07", PaymentOutcome::Declined, "held as suspected fraud"),
    ("09", PaymentOutcome::Declined, "card not registered for online banking"),
    ("10", PaymentOutcome::Declined, "authentication failed three times"),
    ("11", PaymentOutcome::Declined, "payment window expired"),
    ("12", PaymentOutcome::Declined, "card or account locked"),
    ("13", PaymentOutcome::Declined, "wrong one-time password"),
    ("24", PaymentOutcome::Cancelled, "cancelled by customer"),
    ("51", PaymentOutcome::Declined, "insufficient funds"),
    ("65", PaymentOutcome::Declined, "daily transaction limit exceeded"),
    ("75", PaymentOutcome::Declined, "issuing bank under maintenance"),
    ("79", PaymentOutcome::Declined, "wrong payment password"),
    ("99", PaymentOutcome::Declined, "unspecified gateway error"),
];

/// Map a response code onto an outcome. Independent of authenticity.
pub fn classify_response_code(code: Option<&str>) -> PaymentOutcome {
    let Some(code) = code else {
        return PaymentOutcome::Declined;
    };
    RESPONSE_CODES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, outcome, _)| *outcome)
        .unwrap_or(PaymentOutcome::Declined)
}

/// Human-readable description of a response code, for logs only.
pub fn describe_response_code(code: &str) -> &'static str {
    RESPONSE_CODES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, _, description)| *description)
        .unwrap_or("unrecognized response code")
}

/// Verify one inbound callback query string.
///
/// Unknown fields are accepted and included in the recomputed signature —
/// the gateway signed everything it sent. Only the signature itself and
/// the hash-type marker are excluded from the signed set.
pub fn verify_callback(config: &GatewayConfig, raw_query: &str) -> CallbackResult {
    let mut parameter_set = ParameterSet::new();
    let mut received_signature: Option<String> = None;

    for (key, value) in form_urlencoded::parse(raw_query.as_bytes()) {
        match key.as_ref() {
            params::SECURE_HASH => received_signature = Some(value.into_owned()),
            params::SECURE_HASH_TYPE => {}
            _ => {
                parameter_set.insert(key.into_owned(), value.into_owned());
            }
        }
    }

    let response_code = parameter_set.get(params::RESPONSE_CODE).cloned();
    let reference_id = parameter_set.get(params::TXN_REF).cloned();
    let outcome = classify_response_code(response_code.as_deref());

    let authentic = match received_signature {
        // An empty remaining set would mean signing nothing; treat it the
        // same as a missing signature.
        Some(received) if !parameter_set.is_empty() => {
            let canonical = canonicalize(&parameter_set);
            signature::verify(&config.secret_key, &canonical, &received).unwrap_or(false)
        }
        _ => false,
    };

    if !authentic {
        tracing::warn!(
            reference_id = reference_id.as_deref().unwrap_or("<none>"),
            "gateway callback failed signature verification"
        );
    }

    CallbackResult {
        authentic,
        response_code,
        reference_id,
        outcome,
    }
}
