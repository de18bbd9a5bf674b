//! Client address resolution.
//!
//! The gateway receives the shopper's address as an explicit parameter
//! (`vnp_IpAddr`), so the checkout handler needs the real client IP even
//! when the service sits behind proxies. Behind `trusted_proxy_depth`
//! trusted hops, the address is taken from X-Forwarded-For; otherwise
//! from the connecting socket.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use axum::extract::connect_info::ConnectInfo;
use axum::http::{Extensions, HeaderMap};

pub fn extract_client_ip(
    headers: &HeaderMap,
    extensions: &Extensions,
    trusted_proxy_depth: usize,
) -> Option<IpAddr> {
    if let Some(ip) = from_forwarded_headers(headers, trusted_proxy_depth) {
        return Some(ip);
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip())
}

pub fn from_forwarded_headers(headers: &HeaderMap, trusted_proxy_depth: usize) -> Option<IpAddr> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;

    let chain: Vec<IpAddr> = raw
        .split(',')
        .map(str::trim)
        .filter_map(parse_forwarded_entry)
        .collect();

    if chain.is_empty() || trusted_proxy_depth >= chain.len() {
        return None;
    }

    let index = chain.len().saturating_sub(1 + trusted_proxy_depth);
    chain.get(index).copied()
}

fn parse_forwarded_entry(value: &str) -> Option<IpAddr> {
    if let Ok(ip) = IpAddr::from_str(value) {
        return Some(ip);
    }

    if let Ok(addr) = SocketAddr::from_str(value) {
        return Some(addr.ip());
    }

    None
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn takes_last_hop_at_depth_zero() {
        let headers = headers_with_xff("203.0.113.9, 10.0.0.1");
        let ip = extract_client_ip(&headers, &Extensions::new(), 0);
        assert_eq!(ip, Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn walks_past_trusted_proxies() {
        let headers = headers_with_xff("203.0.113.9, 10.0.0.1");
        let ip = extract_client_ip(&headers, &Extensions::new(), 1);
        assert_eq!(ip, Some("203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn depth_beyond_chain_yields_nothing() {
        let headers = headers_with_xff("203.0.113.9");
        assert_eq!(extract_client_ip(&headers, &Extensions::new(), 3), None);
    }

    #[test]
    fn accepts_socket_address_entries() {
        let headers = headers_with_xff("203.0.113.9:4123");
        let ip = extract_client_ip(&headers, &Extensions::new(), 0);
        assert_eq!(ip, Some("203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn falls_back_to_connect_info() {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 7], 55000))));
        let ip = extract_client_ip(&HeaderMap::new(), &extensions, 0);
        assert_eq!(ip, Some("198.51.100.7".parse().unwrap()));
    }

    #[test]
    fn garbage_header_yields_nothing() {
        let headers = headers_with_xff("not-an-ip, also bad");
        assert_eq!(extract_client_ip(&headers, &Extensions::new(), 0), None);
    }
}
