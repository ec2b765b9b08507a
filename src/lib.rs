//! # hostsync
//!
//! Refreshes a static hosts mapping file by re-resolving every domain
//! against several independent DNS resolvers and keeping, per domain, the
//! first address that actually accepts a connection.
//!
//! ## Pipeline
//!
//! 1. Read domains from the hosts file (second column of each entry)
//! 2. Query every configured resolver for A records, merge the answers in
//!    resolver priority order, drop duplicates
//! 3. Probe candidates in that order with a bounded TCP handshake and keep
//!    the first one that connects
//! 4. Write `ADDRESS DOMAIN` lines, or `# Failed to resolve: DOMAIN` when no
//!    candidate works, in input order
//!
//! Domains are processed concurrently; output order always matches input
//! order.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostsync::config::RefreshConfig;
//! use hostsync::hosts::DomainEntry;
//! use hostsync::refresh;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RefreshConfig::default();
//!     let lines = refresh::pipeline(&config)
//!         .run(&[DomainEntry::new("mtalk.google.com")])
//!         .await;
//!     for line in lines {
//!         println!("{}", line);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`config`] - Resolver list, timeouts and paths
//! - [`dns`] - Per-server resolvers and multi-resolver lookup
//! - [`socket`] - Connectivity probing
//! - [`refresh`] - Per-domain orchestration and the batch runner
//! - [`hosts`] - Hosts file parsing and output
//! - [`cli`] - Command-line flags for the `hostsync` binary

pub mod base;
pub mod cli;
pub mod config;
pub mod dns;
pub mod hosts;
pub mod refresh;
pub mod socket;
