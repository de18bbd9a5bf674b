//! Canonical query-string serialization.
//!
//! The gateway signs the exact byte sequence produced here, so the
//! encoding scheme and pair ordering are part of the wire contract:
//! URI component encoding with spaces rewritten to `+`, pairs sorted
//! ascending by their encoded key.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::ParameterSet;

/// Everything except the characters standard URI component encoding
/// leaves literal: `A-Za-z0-9 - _ . ! ~ * ' ( )`. The gateway encodes
/// with exactly this set on its side, so deviating here breaks
/// signature agreement in both directions.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single key or value. Reserved bytes become uppercase
/// `%XX` escapes, then spaces are rewritten from `%20` to `+`. The
/// rewrite cannot touch anything else: a literal `%` encodes to `%25`,
/// so `%20` in the escaped string only ever means a space.
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT)
        .to_string()
        .replace("%20", "+")
}

/// Serialize a parameter set into its canonical query string.
///
/// Pure function: the input is not mutated and identical input always
/// yields a byte-identical string. An empty set yields an empty string;
/// callers must guard against signing nothing.
pub fn canonicalize(parameter_set: &ParameterSet) -> String {
    let mut pairs: Vec<(String, String)> = parameter_set
        .iter()
        .map(|(key, value)| (encode(key), encode(value)))
        .collect();

    // Ordering is by encoded key, not raw key. BTreeMap iteration is
    // already sorted on raw keys, but encoding can reorder them.
    pairs.sort();

    let mut out = String::new();
    for (index, (key, value)) in pairs.iter().enumerate() {
        if index > 0 {
            out.push('&');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> ParameterSet {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sorts_pairs_by_encoded_key_ascending() {
        let set = params(&[("b", "2"), ("a", "1")]);
        assert_eq!(canonicalize(&set), "a=1&b=2");
    }

    #[test]
    fn encodes_spaces_as_plus() {
        let set = params(&[("vnp_OrderInfo", "hello world")]);
        assert_eq!(canonicalize(&set), "vnp_OrderInfo=hello+world");
    }

    #[test]
    fn percent_encodes_reserved_characters() {
        let set = params(&[("vnp_ReturnUrl", "https://shop.example/return?a=1")]);
        assert_eq!(
            canonicalize(&set),
            "vnp_ReturnUrl=https%3A%2F%2Fshop.example%2Freturn%3Fa%3D1"
        );
    }

    #[test]
    fn leaves_component_safe_punctuation_literal() {
        // The gateway's encoder keeps ! ~ * ' ( ) unescaped; free-text
        // order descriptions routinely contain them.
        let set = params(&[("vnp_OrderInfo", "sale (10% off)! ~don't miss*")]);
        assert_eq!(
            canonicalize(&set),
            "vnp_OrderInfo=sale+(10%25+off)!+~don't+miss*"
        );
    }

    #[test]
    fn literal_percent_sequences_survive_the_space_rewrite() {
        let set = params(&[("vnp_OrderInfo", "a%20b c")]);
        assert_eq!(canonicalize(&set), "vnp_OrderInfo=a%2520b+c");
    }

    #[test]
    fn empty_set_yields_empty_string() {
        assert_eq!(canonicalize(&ParameterSet::new()), "");
    }

    #[test]
    fn is_deterministic() {
        let set = params(&[
            ("vnp_Amount", "15000000"),
            ("vnp_TxnRef", "ORDTEST0001"),
            ("vnp_OrderInfo", "Thanh toan don hang"),
        ]);
        assert_eq!(canonicalize(&set), canonicalize(&set));
    }

    #[test]
    fn does_not_mutate_input() {
        let set = params(&[("vnp_OrderInfo", "hello world")]);
        let before = set.clone();
        let _ = canonicalize(&set);
        assert_eq!(set, before);
    }

    #[test]
    fn round_trips_through_query_parsing() {
        let set = params(&[
            ("vnp_OrderInfo", "ao thun nam / size M"),
            ("vnp_TxnRef", "ORD 001"),
        ]);
        let canonical = canonicalize(&set);

        let reparsed: ParameterSet = url::form_urlencoded::parse(canonical.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(reparsed, set);
    }
}
