use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::error::TraceError;

/// Create the raw ICMP socket that listens for the Time Exceeded and Port
/// Unreachable notifications triggered by a probe, bound to the session's
/// identification port with a bounded read timeout.
///
/// Raw sockets need elevated privileges; failure here is a privilege or
/// resource problem and is fatal to the session, not a network condition.
/// The returned socket must be dropped before the next hop's receiver can
/// bind the same port.
pub fn icmp_receiver(port: u16, timeout: Duration) -> Result<Socket, TraceError> {
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
        .map_err(TraceError::ReceiverSocket)?;
    socket
        .set_read_timeout(Some(timeout))
        .map_err(TraceError::ReceiverSocket)?;

    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    socket
        .bind(&SockAddr::from(bind_addr))
        .map_err(|source| TraceError::ReceiverBind { port, source })?;

    Ok(socket)
}

/// Create the UDP socket a probe datagram is sent from, with the outbound
/// TTL set for the current hop.
pub fn udp_sender(ttl: u8) -> Result<Socket, TraceError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(TraceError::SenderSocket)?;
    socket
        .set_ttl(ttl as u32)
        .map_err(TraceError::SenderSocket)?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_port_is_rebindable_after_drop() {
        let timeout = Duration::from_millis(10);
        // Raw sockets need privilege; nothing to verify without it.
        let first = match icmp_receiver(33533, timeout) {
            Ok(socket) => socket,
            Err(_) => return,
        };
        drop(first);
        assert!(icmp_receiver(33533, timeout).is_ok());
    }

    #[test]
    fn sender_carries_the_requested_ttl() {
        // DGRAM sockets are unprivileged; tolerate restricted sandboxes
        // that forbid socket creation entirely.
        match udp_sender(7) {
            Ok(socket) => assert_eq!(socket.ttl().unwrap(), 7),
            Err(TraceError::SenderSocket(_)) => {}
            Err(e) => panic!("unexpected sender error: {e}"),
        }
    }
}
