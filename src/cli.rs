use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Traceroute with offline per-hop geolocation
#[derive(Parser, Debug, Clone)]
#[command(name = "hopmap")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Destination host (prompted for when omitted)
    pub host: Option<String>,

    /// Maximum number of hops to probe
    #[arg(short = 'm', long = "max-hops", default_value_t = 30, value_parser = clap::value_parser!(u8).range(1..))]
    pub max_hops: u8,

    /// Path to a MaxMind GeoLite2 City database
    #[arg(long = "geoip-db")]
    pub geoip_db: Option<PathBuf>,

    /// Per-hop reply timeout in seconds
    #[arg(long = "timeout", default_value_t = 5.0)]
    pub timeout: f64,

    /// Pin the identification port instead of drawing one at random
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err("Timeout must be positive".into());
        }

        if self.port == Some(0) {
            return Err("Port must be nonzero".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_tool() {
        let args = Args::try_parse_from(["hopmap", "example.test"]).unwrap();
        assert_eq!(args.host.as_deref(), Some("example.test"));
        assert_eq!(args.max_hops, 30);
        assert_eq!(args.timeout_duration(), Duration::from_secs(5));
        assert!(args.port.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn zero_max_hops_is_rejected_at_parse_time() {
        assert!(Args::try_parse_from(["hopmap", "example.test", "-m", "0"]).is_err());
    }

    #[test]
    fn host_may_be_omitted() {
        let args = Args::try_parse_from(["hopmap"]).unwrap();
        assert!(args.host.is_none());
    }

    #[test]
    fn nonpositive_timeout_fails_validation() {
        let args = Args::try_parse_from(["hopmap", "example.test", "--timeout", "0"]).unwrap();
        assert!(args.validate().is_err());
    }
}
