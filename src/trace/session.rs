use rand::Rng;
use std::net::Ipv4Addr;
use std::ops::Range;
use std::time::Duration;

/// Destination-port range probes are addressed to; one port is drawn per
/// session (the classic traceroute range).
pub const PORT_RANGE: Range<u16> = 33434..33535;

/// A single trace in progress.
#[derive(Debug, Clone)]
pub struct Session {
    /// Destination as the user gave it.
    pub host: String,
    /// Resolved destination address, compared against every captured
    /// reply to detect arrival.
    pub dest: Ipv4Addr,
    /// TTL values 1..=max_hops are visited unless the destination answers
    /// first.
    pub max_hops: u8,
    /// Destination port of every outbound probe. Fixed for the session so
    /// inbound notifications can plausibly be attributed to this trace.
    pub port: u16,
}

impl Session {
    pub fn new(host: impl Into<String>, dest: Ipv4Addr, max_hops: u8) -> Self {
        let port = rand::thread_rng().gen_range(PORT_RANGE);
        Self::with_port(host, dest, max_hops, port)
    }

    pub fn with_port(host: impl Into<String>, dest: Ipv4Addr, max_hops: u8, port: u16) -> Self {
        Self {
            host: host.into(),
            dest,
            max_hops,
            port,
        }
    }
}

/// A reply captured for one TTL: who answered and how long it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopReply {
    pub addr: Ipv4Addr,
    pub rtt: Duration,
}

/// Outcome of probing one TTL value. No reply means the hop timed out;
/// round-trip time and location exist only alongside an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopReport {
    pub ttl: u8,
    pub reply: Option<HopReply>,
}

impl HopReport {
    /// Whether the captured address is the resolved destination.
    pub fn reached(&self, dest: Ipv4Addr) -> bool {
        self.reply.map_or(false, |reply| reply.addr == dest)
    }
}

/// Terminal state of the probing loop. Both exit cleanly; the distinction
/// exists so callers and tests can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// A captured address matched the resolved destination.
    DestinationReached { ttl: u8 },
    /// TTL passed the maximum hop count without a destination match.
    HopLimitExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_draws_port_from_classic_range() {
        let dest = Ipv4Addr::new(192, 0, 2, 1);
        for _ in 0..100 {
            let session = Session::new("example.test", dest, 30);
            assert!(PORT_RANGE.contains(&session.port));
        }
    }

    #[test]
    fn pinned_port_is_kept() {
        let session = Session::with_port("example.test", Ipv4Addr::new(192, 0, 2, 1), 5, 33500);
        assert_eq!(session.port, 33500);
        assert_eq!(session.max_hops, 5);
    }

    #[test]
    fn reached_only_on_matching_address() {
        let dest = Ipv4Addr::new(192, 0, 2, 1);
        let hit = HopReport {
            ttl: 3,
            reply: Some(HopReply {
                addr: dest,
                rtt: Duration::from_millis(10),
            }),
        };
        let miss = HopReport {
            ttl: 3,
            reply: Some(HopReply {
                addr: Ipv4Addr::new(10, 0, 0, 1),
                rtt: Duration::from_millis(10),
            }),
        };
        let silent = HopReport { ttl: 3, reply: None };

        assert!(hit.reached(dest));
        assert!(!miss.reached(dest));
        assert!(!silent.reached(dest));
    }
}
