//! Command-line arguments.

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::config::{RefreshConfig, ResolverEndpoint};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Re-resolve every domain of a hosts file and keep only addresses that
/// accept connections.
#[derive(Parser, Debug, Clone)]
#[command(name = "hostsync", version)]
pub struct Args {
    /// Hosts file to read, relative to the working directory (skips the
    /// default search locations)
    #[arg(long)]
    pub hosts: Option<PathBuf>,

    /// Output file, relative to the working directory (default: hosts.txt
    /// next to the program)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// DNS resolver to query, in priority order (repeatable, replaces the defaults)
    #[arg(long = "resolver", value_name = "ADDR")]
    pub resolvers: Vec<ResolverEndpoint>,

    /// Timeout for a single DNS query, in milliseconds
    #[arg(long)]
    pub query_timeout_ms: Option<u64>,

    /// Timeout for a single connectivity probe, in milliseconds
    #[arg(long)]
    pub probe_timeout_ms: Option<u64>,

    /// Port to probe on each candidate
    #[arg(long)]
    pub probe_port: Option<u16>,

    /// Domains resolved at once (1 = sequential)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Also print the new hosts content to stdout
    #[arg(long, default_value_t = false)]
    pub print: bool,

    /// Debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Load the base config (file or defaults) and apply flag overrides.
    pub fn to_config(&self) -> Result<RefreshConfig, NetError> {
        let mut config = match &self.config {
            Some(path) => RefreshConfig::from_json_file(path)?,
            None => RefreshConfig::default(),
        };

        if !self.resolvers.is_empty() {
            config = config.with_resolvers(self.resolvers.clone());
        }
        if let Some(ms) = self.query_timeout_ms {
            config = config.with_query_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.probe_timeout_ms {
            config = config.with_probe_timeout(Duration::from_millis(ms));
        }
        if let Some(port) = self.probe_port {
            config = config.with_probe_port(port);
        }
        if let Some(n) = self.concurrency {
            config = config.with_concurrency(n);
        }
        // Relative config paths resolve against the program directory, but a
        // path typed on the command line means the working directory
        if let Some(path) = &self.hosts {
            config = config.with_hosts_candidates(vec![absolute(path)?]);
        }
        if let Some(path) = &self.output {
            config = config.with_output_path(absolute(path)?);
        }

        config.validate()?;
        Ok(config)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, NetError> {
    std::path::absolute(path).hosts_context(path)
}
