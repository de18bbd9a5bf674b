use std::net::IpAddr;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AllowedIps;
use crate::utils::client_ip::extract_client_ip;
use crate::AppState;

/// Restricts the IPN route to the gateway's published source ranges.
/// Spoofing the IPN endpoint still requires a valid signature; the
/// allowlist just cuts the noise before verification runs.
pub async fn ipn_ip_allowlist(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(
        req.headers(),
        req.extensions(),
        state.config.trusted_proxy_depth,
    );

    if !is_allowed(client_ip, &state.config.allowed_ipn_ips) {
        tracing::warn!(client_ip = ?client_ip, "blocked IPN request from non-allowlisted address");
        return StatusCode::FORBIDDEN.into_response();
    }

    next.run(req).await
}

fn is_allowed(client_ip: Option<IpAddr>, allowed_ips: &AllowedIps) -> bool {
    match allowed_ips {
        AllowedIps::Any => true,
        AllowedIps::Cidrs(cidrs) => client_ip
            .map(|ip| cidrs.iter().any(|cidr| cidr.contains(&ip)))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use ipnet::IpNet;

    use super::*;

    fn cidrs(entries: &[&str]) -> AllowedIps {
        AllowedIps::Cidrs(
            entries
                .iter()
                .map(|entry| entry.parse::<IpNet>().unwrap())
                .collect(),
        )
    }

    #[test]
    fn any_allows_everything() {
        assert!(is_allowed(Some("203.0.113.9".parse().unwrap()), &AllowedIps::Any));
        assert!(is_allowed(None, &AllowedIps::Any));
    }

    #[test]
    fn cidr_list_matches_contained_addresses() {
        let allowed = cidrs(&["203.0.113.0/24"]);
        assert!(is_allowed(Some("203.0.113.9".parse().unwrap()), &allowed));
        assert!(!is_allowed(Some("198.51.100.7".parse().unwrap()), &allowed));
    }

    #[test]
    fn unknown_address_is_blocked_under_cidr_list() {
        let allowed = cidrs(&["203.0.113.0/24"]);
        assert!(!is_allowed(None, &allowed));
    }
}
