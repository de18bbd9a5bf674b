/// Masks signature and credential values inside a raw query string so
/// request logs never carry usable secrets.
pub fn mask_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if is_sensitive_field(key) => {
                format!("{}={}", key, mask_str(value))
            }
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "vnp_securehash"
            | "vnp_securehashtype"
            | "secret"
            | "secret_key"
            | "password"
            | "token"
            | "api_key"
            | "authorization"
    )
}

fn mask_str(s: &str) -> String {
    if s.len() > 8 {
        format!("{}****{}", &s[..4], &s[s.len() - 4..])
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_query_hides_signature() {
        let query = "vnp_Amount=15000000&vnp_SecureHash=aaaabbbbccccdddd";
        let masked = mask_query(query);

        assert!(masked.contains("vnp_Amount=15000000"));
        assert!(masked.contains("vnp_SecureHash=aaaa****dddd"));
        assert!(!masked.contains("bbbbcccc"));
    }

    #[test]
    fn test_mask_query_short_values_fully_masked() {
        assert_eq!(mask_query("secret=abc"), "secret=****");
    }

    #[test]
    fn test_mask_query_leaves_plain_fields_alone() {
        let query = "vnp_TxnRef=ORD0001&vnp_ResponseCode=00";
        assert_eq!(mask_query(query), query);
    }

    #[test]
    fn test_mask_query_handles_valueless_pairs() {
        assert_eq!(mask_query("flag&vnp_TxnRef=ORD1"), "flag&vnp_TxnRef=ORD1");
    }
}
