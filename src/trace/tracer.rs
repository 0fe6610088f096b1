//! The TTL-indexed probing loop.

use std::io::Write;
use tracing::debug;

use crate::error::TraceError;
use crate::lookup::Geolocate;
use crate::probe::HopProbe;
use crate::trace::session::{HopReport, Session, TraceOutcome};

/// Drive the per-hop probing loop to one of its terminal states.
///
/// Emits the banner line, then exactly one line per visited TTL. The
/// destination check happens after the matching hop's line is written, so
/// the destination hop always appears in the output. A geolocation lookup
/// can only ever change the location text, never the control flow.
pub fn trace<P, G, W>(
    session: &Session,
    prober: &mut P,
    geo: &G,
    out: &mut W,
) -> Result<TraceOutcome, TraceError>
where
    P: HopProbe + ?Sized,
    G: Geolocate + ?Sized,
    W: Write,
{
    writeln!(
        out,
        "traceroute to {} ({}), {} hops max",
        session.host, session.dest, session.max_hops
    )?;

    for ttl in 1..=session.max_hops {
        let report = HopReport {
            ttl,
            reply: prober.probe(ttl)?,
        };

        match report.reply {
            Some(reply) => {
                let location = geo.locate(reply.addr);
                writeln!(
                    out,
                    "{:<4} {} {:.2} ms {}",
                    ttl,
                    reply.addr,
                    reply.rtt.as_secs_f64() * 1000.0,
                    location
                )?;
                if report.reached(session.dest) {
                    debug!(ttl, "destination reached");
                    return Ok(TraceOutcome::DestinationReached { ttl });
                }
            }
            None => {
                writeln!(out, "{:<4} *", ttl)?;
            }
        }
    }

    debug!(max_hops = session.max_hops, "hop limit exhausted");
    Ok(TraceOutcome::HopLimitExhausted)
}
