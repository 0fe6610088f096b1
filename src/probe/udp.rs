use socket2::SockAddr;
use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::TraceError;
use crate::probe::socket::{icmp_receiver, udp_sender};
use crate::trace::HopReply;

/// One full send/receive cycle for a single TTL.
///
/// `Ok(None)` means the hop did not respond within the timeout, which is
/// an expected outcome and keeps the loop going. `Err` is fatal to the
/// session.
pub trait HopProbe {
    fn probe(&mut self, ttl: u8) -> Result<Option<HopReply>, TraceError>;
}

/// The real prober: sends one empty UDP datagram per TTL and waits for the
/// ICMP notification it provokes.
pub struct UdpProbe {
    dest: Ipv4Addr,
    port: u16,
    timeout: Duration,
}

impl UdpProbe {
    pub fn new(dest: Ipv4Addr, port: u16, timeout: Duration) -> Self {
        Self {
            dest,
            port,
            timeout,
        }
    }
}

impl HopProbe for UdpProbe {
    /// Both sockets are scoped to this call and dropped on every exit
    /// path, so the identification port is free again before the next
    /// iteration tries to bind it.
    fn probe(&mut self, ttl: u8) -> Result<Option<HopReply>, TraceError> {
        let started = Instant::now();

        let receiver = icmp_receiver(self.port, self.timeout)?;
        let sender = udp_sender(ttl)?;

        let target = SocketAddr::new(IpAddr::V4(self.dest), self.port);
        sender
            .send_to(&[], &SockAddr::from(target))
            .map_err(TraceError::SendProbe)?;
        debug!(ttl, port = self.port, "probe sent");

        let mut buf = [MaybeUninit::<u8>::uninit(); 1024];
        match receiver.recv_from(&mut buf) {
            Ok((_, from)) => {
                let rtt = started.elapsed();
                match from.as_socket().map(|sa| sa.ip()) {
                    Some(IpAddr::V4(addr)) => {
                        debug!(ttl, %addr, rtt_ms = rtt.as_secs_f64() * 1000.0, "reply");
                        Ok(Some(HopReply { addr, rtt }))
                    }
                    // An IPv4 raw socket should not produce anything else;
                    // treat it like silence rather than failing the trace.
                    _ => Ok(None),
                }
            }
            // Timeout and any other receive error are the no-reply signal,
            // not a session failure.
            Err(e) => {
                debug!(ttl, error = %e, "no reply within timeout");
                Ok(None)
            }
        }
    }
}
