use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use crate::error::TraceError;

/// Resolve a destination host to a single IPv4 address.
///
/// Tries to parse the host as an IPv4 literal first, then falls back to a
/// blocking system lookup and takes the first IPv4 address. The result is
/// treated as stable for the whole session: a round-robin DNS name could
/// resolve differently on a second call, so the address captured here is
/// the one every hop reply is compared against.
pub fn resolve_ipv4(host: &str) -> Result<Ipv4Addr, TraceError> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    let addrs = (host, 0)
        .to_socket_addrs()
        .map_err(|source| TraceError::ResolveFailed {
            host: host.to_string(),
            source,
        })?;

    addrs
        .filter_map(|sa| match sa.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| TraceError::NoIpv4Address {
            host: host.to_string(),
        })
}
