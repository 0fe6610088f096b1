use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum TTL to visit
    pub max_hops: u8,
    /// Per-hop reply timeout
    pub timeout: Duration,
    /// Pinned identification port (None = draw one per session)
    pub port: Option<u16>,
    /// Explicit geolocation database path (None = well-known locations)
    pub geoip_db: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hops: 30,
            timeout: Duration::from_secs(5),
            port: None,
            geoip_db: None,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            max_hops: args.max_hops,
            timeout: args.timeout_duration(),
            port: args.port,
            geoip_db: args.geoip_db.clone(),
        }
    }
}
