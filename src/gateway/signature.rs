//! Keyed signing of canonical query strings.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use super::GatewayError;

type HmacSha512 = Hmac<Sha512>;

/// SHA-512 output rendered as hex.
pub const SIGNATURE_HEX_LEN: usize = 128;

/// Compute the HMAC-SHA512 of a canonical query string, rendered as
/// lowercase hex. An empty secret is a configuration error, not a weaker
/// signature.
pub fn sign(secret_key: &str, canonical: &str) -> Result<String, GatewayError> {
    if secret_key.is_empty() {
        return Err(GatewayError::MissingSecretKey);
    }

    let mut mac = HmacSha512::new_from_slice(secret_key.as_bytes())
        .map_err(|_| GatewayError::MissingSecretKey)?;
    mac.update(canonical.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a received signature against the canonical string.
///
/// The gateway renders signatures as exactly 128 lowercase hex characters;
/// anything else is malformed and fails verification outright. Matching
/// signatures are compared constant-time.
pub fn verify(
    secret_key: &str,
    canonical: &str,
    received_hex: &str,
) -> Result<bool, GatewayError> {
    if secret_key.is_empty() {
        return Err(GatewayError::MissingSecretKey);
    }

    if received_hex.len() != SIGNATURE_HEX_LEN
        || !received_hex
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return Ok(false);
    }

    let received = match hex::decode(received_hex) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };

    let mut mac = HmacSha512::new_from_slice(secret_key.as_bytes())
        .map_err(|_| GatewayError::MissingSecretKey)?;
    mac.update(canonical.as_bytes());
    Ok(mac.verify_slice(&received).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "TESTKEY123";
    const CANONICAL: &str = "vnp_Amount=15000000&vnp_TxnRef=ORDTEST0001";

    #[test]
    fn produces_lowercase_hex_of_expected_length() {
        let signature = sign(SECRET, CANONICAL).unwrap();
        assert_eq!(signature.len(), SIGNATURE_HEX_LEN);
        assert!(signature
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn is_stable_for_identical_input() {
        assert_eq!(
            sign(SECRET, CANONICAL).unwrap(),
            sign(SECRET, CANONICAL).unwrap()
        );
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        assert!(matches!(
            sign("", CANONICAL),
            Err(GatewayError::MissingSecretKey)
        ));
        assert!(matches!(
            verify("", CANONICAL, "00"),
            Err(GatewayError::MissingSecretKey)
        ));
    }

    #[test]
    fn verifies_own_signature() {
        let signature = sign(SECRET, CANONICAL).unwrap();
        assert!(verify(SECRET, CANONICAL, &signature).unwrap());
    }

    #[test]
    fn rejects_signature_from_different_key() {
        let signature = sign("OTHERKEY", CANONICAL).unwrap();
        assert!(!verify(SECRET, CANONICAL, &signature).unwrap());
    }

    #[test]
    fn rejects_signature_over_different_payload() {
        let signature = sign(SECRET, "vnp_Amount=1").unwrap();
        assert!(!verify(SECRET, CANONICAL, &signature).unwrap());
    }

    #[test]
    fn rejects_uppercase_hex_rendering() {
        let signature = sign(SECRET, CANONICAL).unwrap().to_uppercase();
        assert!(!verify(SECRET, CANONICAL, &signature).unwrap());
    }

    #[test]
    fn rejects_truncated_signature() {
        let signature = sign(SECRET, CANONICAL).unwrap();
        assert!(!verify(SECRET, CANONICAL, &signature[..64]).unwrap());
    }
}
