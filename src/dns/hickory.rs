//! Async DNS resolver using hickory-dns.
//!
//! Unlike a system resolver, each [`HickoryResolver`] talks to exactly one
//! name server. That keeps answers from different upstreams separate so
//! they can be compared and merged in priority order.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use crate::config::ResolverEndpoint;
use hickory_resolver::{
    config::{
        LookupIpStrategy, NameServerConfig, NameServerConfigGroup, ResolveHosts, ResolverConfig,
        ResolverOpts,
    },
    name_server::TokioConnectionProvider,
    proto::{xfer::Protocol, ProtoErrorKind},
    ResolveError, ResolveErrorKind, TokioResolver,
};
use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
    time::Duration,
};

/// A-record resolver pinned to a single name server.
///
/// Queries go out once over UDP (no retries, no fallback to other servers).
#[derive(Clone)]
pub struct HickoryResolver {
    endpoint: ResolverEndpoint,
    resolver: Arc<TokioResolver>,
}

impl HickoryResolver {
    /// Creates a resolver that only queries `endpoint`.
    pub fn for_endpoint(endpoint: ResolverEndpoint, timeout: Duration) -> Self {
        let name_servers = NameServerConfigGroup::from(vec![NameServerConfig::new(
            endpoint.addr(),
            Protocol::Udp,
        )]);
        let config = ResolverConfig::from_parts(None, vec![], name_servers);

        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(resolver_opts(timeout))
            .build();

        Self {
            endpoint,
            resolver: Arc::new(resolver),
        }
    }

    pub fn endpoint(&self) -> ResolverEndpoint {
        self.endpoint
    }
}

/// Single attempt, IPv4 only, and never answered from the local hosts file:
/// the file being refreshed may itself be installed as `/etc/hosts`.
fn resolver_opts(timeout: Duration) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.ip_strategy = LookupIpStrategy::Ipv4Only;
    opts.use_hosts_file = ResolveHosts::Never;
    opts
}

/// Maps a hickory failure onto the DNS error codes.
fn classify(err: &ResolveError) -> NetError {
    if err.is_nx_domain() || err.is_no_records_found() {
        return NetError::NameNotResolved;
    }
    match err.kind() {
        ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
            NetError::DnsTimedOut
        }
        _ => NetError::NameResolutionFailed,
    }
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, resolver = %resolver.endpoint, "querying A records");

            let lookup = resolver.resolver.lookup_ip(domain).await.map_err(|e| {
                let err = classify(&e);
                tracing::debug!(
                    domain = %domain,
                    resolver = %resolver.endpoint,
                    error = %e,
                    code = err.as_i32(),
                    "hickory-dns lookup failed"
                );
                err
            })?;

            let addrs: Vec<Ipv4Addr> = lookup
                .iter()
                .filter_map(|ip| match ip {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                })
                .collect();

            if addrs.is_empty() {
                return Err(NetError::NameNotResolved);
            }

            tracing::debug!(
                domain = %domain,
                resolver = %resolver.endpoint,
                count = addrs.len(),
                "hickory-dns resolution complete"
            );
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

impl std::fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryResolver")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
