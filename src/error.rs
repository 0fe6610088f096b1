use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for a trace.
///
/// Everything here is fatal to the session: setup failures surface before
/// any hop is probed, and a receiver bind failure aborts the run even
/// mid-trace. A probe that gets no reply within the timeout is not an
/// error and never appears in this enum.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("could not resolve destination {host}: {source}")]
    ResolveFailed {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("no IPv4 address found for {host}")]
    NoIpv4Address { host: String },

    #[error("could not open geolocation database {}: {}", .path.display(), .source)]
    GeoDatabase {
        path: PathBuf,
        #[source]
        source: maxminddb::MaxMindDBError,
    },

    #[error("failed to create receiver socket: {0}")]
    ReceiverSocket(#[source] io::Error),

    #[error("failed to bind receiver socket to port {port}: {source}")]
    ReceiverBind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to create sender socket: {0}")]
    SenderSocket(#[source] io::Error),

    #[error("failed to send probe: {0}")]
    SendProbe(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
