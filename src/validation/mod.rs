use std::fmt;

use bigdecimal::BigDecimal;

pub const REFERENCE_ID_MAX_LEN: usize = 100;
pub const ORDER_INFO_MAX_LEN: usize = 255;
pub const BANK_CODE_MAX_LEN: usize = 20;
pub const ALLOWED_LOCALES: &[&str] = &["vn", "en"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Strips control characters and collapses runs of whitespace. Order
/// descriptions end up inside a signed query string, so they are
/// normalized before the parameter set is built.
pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_enum(field: &'static str, value: &str, allowed: &[&str]) -> ValidationResult {
    if allowed.iter().all(|candidate| value != *candidate) {
        return Err(ValidationError::new(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ));
    }

    Ok(())
}

/// Reference ids live in the gateway's transaction namespace and are
/// echoed back in callbacks, so they are restricted to a conservative
/// charset.
pub fn validate_reference_id(reference_id: &str) -> ValidationResult {
    let reference_id = sanitize_string(reference_id);
    validate_required("reference_id", &reference_id)?;
    validate_max_len("reference_id", &reference_id, REFERENCE_ID_MAX_LEN)?;

    if !reference_id
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(ValidationError::new(
            "reference_id",
            "must contain only letters, digits, '-' and '_'",
        ));
    }

    Ok(())
}

pub fn validate_order_info(order_info: &str) -> ValidationResult {
    let order_info = sanitize_string(order_info);
    validate_required("order_info", &order_info)?;
    validate_max_len("order_info", &order_info, ORDER_INFO_MAX_LEN)?;

    Ok(())
}

pub fn validate_bank_code(bank_code: &str) -> ValidationResult {
    let bank_code = sanitize_string(bank_code);
    validate_required("bank_code", &bank_code)?;
    validate_max_len("bank_code", &bank_code, BANK_CODE_MAX_LEN)?;

    if !bank_code
        .chars()
        .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
    {
        return Err(ValidationError::new(
            "bank_code",
            "must contain only uppercase letters and digits",
        ));
    }

    Ok(())
}

pub fn validate_locale(locale: &str) -> ValidationResult {
    validate_enum("locale", locale, ALLOWED_LOCALES)
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
    }

    #[test]
    fn validates_max_len() {
        assert!(validate_max_len("field", "abc", 3).is_ok());
        assert!(validate_max_len("field", "abcd", 3).is_err());
    }

    #[test]
    fn validates_enum_values() {
        assert!(validate_enum("locale", "vn", &["vn", "en"]).is_ok());
        assert!(validate_enum("locale", "fr", &["vn", "en"]).is_err());
    }

    #[test]
    fn sanitizes_string() {
        assert_eq!(sanitize_string("  hello\tworld  "), "hello world");
        assert_eq!(sanitize_string("single"), "single");
        assert_eq!(sanitize_string(" \n "), "");
        assert_eq!(sanitize_string("ab\u{0000}cd\u{0007}"), "abcd");
    }

    #[test]
    fn validates_reference_id() {
        assert!(validate_reference_id("ORDTEST0001").is_ok());
        assert!(validate_reference_id("ord-2026_08").is_ok());
        assert!(validate_reference_id("").is_err());
        assert!(validate_reference_id("ord ref").is_err());
        assert!(validate_reference_id(&"A".repeat(101)).is_err());
    }

    #[test]
    fn validates_order_info() {
        assert!(validate_order_info("Thanh toan don hang").is_ok());
        assert!(validate_order_info("  ").is_err());
        assert!(validate_order_info(&"x".repeat(256)).is_err());
    }

    #[test]
    fn validates_bank_code() {
        assert!(validate_bank_code("NCB").is_ok());
        assert!(validate_bank_code("VNPAYQR").is_ok());
        assert!(validate_bank_code("ncb").is_err());
        assert!(validate_bank_code("").is_err());
    }

    #[test]
    fn validates_positive_amount() {
        let positive = BigDecimal::from_str("150000").expect("valid decimal");
        let fractional = BigDecimal::from_str("0.01").expect("valid decimal");
        let zero = BigDecimal::from(0);
        let negative = BigDecimal::from(-1);

        assert!(validate_positive_amount(&positive).is_ok());
        assert!(validate_positive_amount(&fractional).is_ok());
        assert!(validate_positive_amount(&zero).is_err());
        assert!(validate_positive_amount(&negative).is_err());
    }
}
