//! Refresh configuration.
//!
//! Everything the pipeline needs is carried by a [`RefreshConfig`] value
//! passed in at construction. Defaults reproduce the stock resolver list and
//! timeouts; a JSON file or command-line flags can override any of them.

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Standard DNS port used when an endpoint omits one.
pub const DNS_PORT: u16 = 53;

/// Address of a DNS server to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint {
    addr: SocketAddr,
}

impl ResolverEndpoint {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Endpoint on the standard DNS port.
    pub fn from_ip(ip: impl Into<IpAddr>) -> Self {
        Self::new(SocketAddr::new(ip.into(), DNS_PORT))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl FromStr for ResolverEndpoint {
    type Err = NetError;

    /// Accepts `"1.1.1.1"` (port 53) or `"1.1.1.1:5353"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::from_ip(ip));
        }
        s.parse::<SocketAddr>()
            .map(Self::new)
            .map_err(|_| NetError::invalid_config(format!("invalid resolver address: {s:?}")))
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.addr.port() == DNS_PORT {
            fmt::Display::fmt(&self.addr.ip(), f)
        } else {
            fmt::Display::fmt(&self.addr, f)
        }
    }
}

impl Serialize for ResolverEndpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResolverEndpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Resolvers in priority order
    pub resolvers: Vec<ResolverEndpoint>,
    /// Timeout for a single DNS query
    #[serde(with = "duration_ms", rename = "query_timeout_ms")]
    pub query_timeout: Duration,
    /// Timeout for a single connectivity probe
    #[serde(with = "duration_ms", rename = "probe_timeout_ms")]
    pub probe_timeout: Duration,
    /// Port probed on each candidate
    pub probe_port: u16,
    /// Maximum number of domains resolved at once
    pub concurrency: usize,
    /// Hosts file locations tried in order, relative paths resolve against
    /// the program directory
    pub hosts_candidates: Vec<PathBuf>,
    /// Output file, relative paths resolve against the program directory
    pub output_path: PathBuf,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            resolvers: vec![
                ResolverEndpoint::from_ip(Ipv4Addr::new(8, 8, 8, 8)),
                ResolverEndpoint::from_ip(Ipv4Addr::new(1, 1, 1, 1)),
                ResolverEndpoint::from_ip(Ipv4Addr::new(9, 9, 9, 9)),
                ResolverEndpoint::from_ip(Ipv4Addr::new(208, 67, 222, 222)),
            ],
            query_timeout: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(3),
            probe_port: 443,
            concurrency: 8,
            hosts_candidates: vec![
                PathBuf::from("hosts"),
                PathBuf::from("../hosts"),
                PathBuf::from("../systemless-fcm-hosts/hosts"),
            ],
            output_path: PathBuf::from("hosts.txt"),
        }
    }
}

impl RefreshConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, NetError> {
        let text = std::fs::read_to_string(path).hosts_context(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| NetError::invalid_config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the resolver list.
    pub fn with_resolvers(mut self, resolvers: Vec<ResolverEndpoint>) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Set the per-query DNS timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set the per-probe connect timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the probed port.
    pub fn with_probe_port(mut self, port: u16) -> Self {
        self.probe_port = port;
        self
    }

    /// Set how many domains may be in flight at once. 1 is fully sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Replace the hosts file candidate list.
    pub fn with_hosts_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.hosts_candidates = candidates;
        self
    }

    /// Set the output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), NetError> {
        if self.resolvers.is_empty() {
            return Err(NetError::invalid_config("resolver list is empty"));
        }
        if self.query_timeout.is_zero() {
            return Err(NetError::invalid_config("query timeout must be non-zero"));
        }
        if self.probe_timeout.is_zero() {
            return Err(NetError::invalid_config("probe timeout must be non-zero"));
        }
        if self.probe_port == 0 {
            return Err(NetError::invalid_config("probe port must be non-zero"));
        }
        if self.concurrency == 0 {
            return Err(NetError::invalid_config("concurrency must be at least 1"));
        }
        if self.hosts_candidates.is_empty() {
            return Err(NetError::invalid_config("no hosts file candidates"));
        }
        Ok(())
    }

    /// Hosts file candidates anchored at `base`.
    pub fn candidate_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.hosts_candidates.iter().map(|p| base.join(p)).collect()
    }

    /// Output path anchored at `base`.
    pub fn output_path_in(&self, base: &Path) -> PathBuf {
        base.join(&self.output_path)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
