use maxminddb::{geoip2, MaxMindDBError, Reader};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::TraceError;

/// Well-known database filename tried when no path is given.
pub const DEFAULT_DB_FILE: &str = "GeoLite2-City.mmdb";

/// A place resolved from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub city: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Outcome of one geolocation lookup.
///
/// `NotFound` is the database saying "I have no record for this address";
/// it is not a failure. `Failed` covers everything else that can go wrong
/// during a lookup. Neither ever aborts a trace; both render as text in
/// the hop line.
#[derive(Debug, Clone, PartialEq)]
pub enum Located {
    Found(Place),
    NotFound,
    Failed(String),
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude.unwrap_or(0.0);
        let lon = self.longitude.unwrap_or(0.0);
        match &self.city {
            Some(city) => write!(f, "{}, {} (Lat: {:?}, Lon: {:?})", city, self.country, lat, lon),
            None => write!(f, "{} (Lat: {:?}, Lon: {:?})", self.country, lat, lon),
        }
    }
}

impl fmt::Display for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Located::Found(place) => place.fmt(f),
            Located::NotFound => f.write_str("unknown location"),
            Located::Failed(reason) => write!(f, "location lookup failed: {reason}"),
        }
    }
}

/// Address-to-place lookup seam, so the trace loop can be exercised with a
/// scripted implementation.
pub trait Geolocate {
    fn locate(&self, addr: Ipv4Addr) -> Located;
}

/// Geolocation lookup backed by a MaxMind GeoLite2 City database.
///
/// Lookups are not cached: a repeated responder address is re-resolved on
/// every hop, which is a local file read and cheap enough.
pub struct GeoReader {
    reader: Reader<Vec<u8>>,
}

impl std::fmt::Debug for GeoReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoReader").finish_non_exhaustive()
    }
}

impl GeoReader {
    /// Open a database file. Failure here is fatal to the session: it
    /// signals a missing or unreadable file, not a network condition.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening geolocation database");
        let reader = Reader::open_readfile(path).map_err(|source| TraceError::GeoDatabase {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "geolocation database loaded");
        Ok(Self { reader })
    }

    /// Open the first database found among the well-known locations. When
    /// none exists, the open of the bare default filename reports the
    /// failure.
    pub fn open_default() -> Result<Self, TraceError> {
        for path in default_candidates() {
            if path.exists() {
                return Self::open(path);
            }
        }
        Self::open(DEFAULT_DB_FILE)
    }
}

/// Candidate database paths, tried in order.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(DEFAULT_DB_FILE)];
    if let Some(dir) = dirs::data_dir() {
        paths.push(dir.join("hopmap").join(DEFAULT_DB_FILE));
    }
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("hopmap").join(DEFAULT_DB_FILE));
    }
    paths.push(PathBuf::from("/usr/share/GeoIP").join(DEFAULT_DB_FILE));
    paths.push(PathBuf::from("/var/lib/GeoIP").join(DEFAULT_DB_FILE));
    paths
}

impl Geolocate for GeoReader {
    fn locate(&self, addr: Ipv4Addr) -> Located {
        let city: geoip2::City = match self.reader.lookup(IpAddr::V4(addr)) {
            Ok(city) => city,
            Err(MaxMindDBError::AddressNotFoundError(_)) => return Located::NotFound,
            Err(e) => return Located::Failed(e.to_string()),
        };

        // A record without a country name is as good as no record.
        let country = match city
            .country
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|n| n.get("en"))
            .map(|s| s.to_string())
        {
            Some(country) => country,
            None => return Located::NotFound,
        };

        let city_name = city
            .city
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|n| n.get("en"))
            .map(|s| s.to_string());

        let (latitude, longitude) = city
            .location
            .as_ref()
            .map(|loc| (loc.latitude, loc.longitude))
            .unwrap_or((None, None));

        Located::Found(Place {
            city: city_name,
            country,
            latitude,
            longitude,
        })
    }
}
