use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::Url;

use crate::error::ConfigurationError;

/// Returns true when `host` is a literal IP address outside the globally
/// routable space. Hostnames are never excluded.
pub fn is_excluded(host: &str) -> bool {
    let literal = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')).unwrap_or(host);
    match literal.parse::<IpAddr>() {
        Ok(ip) => is_private_ip(ip),
        Err(_) => false,
    }
}

pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_private_v4(v4),
            None => is_private_v6(v6),
        },
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || a == 0
        // 100.64.0.0/10 carrier-grade NAT
        || (a == 100 && (b & 0xc0) == 64)
        // 198.18.0.0/15 benchmarking
        || (a == 198 && (b & 0xfe) == 18)
        || a >= 240
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    let segments = ip.segments();
    let first = segments[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link-local
        || (first & 0xffc0) == 0xfe80
        // fec0::/10 deprecated site-local
        || (first & 0xffc0) == 0xfec0
        // 100::/64 discard-only
        || segments[..4] == [0x0100, 0, 0, 0]
        // 64:ff9b:1::/48 local-use NAT64
        || segments[..3] == [0x0064, 0xff9b, 0x0001]
        // 2001:db8::/32 documentation
        || (first == 0x2001 && segments[1] == 0x0db8)
}

/// Extracts the host part of a cluster server URL.
pub fn server_host(server: &str) -> Result<String, ConfigurationError> {
    let url = Url::parse(server)
        .map_err(|source| ConfigurationError::MalformedServerUrl { server: server.to_string(), source })?;
    Ok(url.host_str().unwrap_or_default().to_string())
}
