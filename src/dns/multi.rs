//! Fan-out lookup across several independent resolvers.
//!
//! Every configured resolver is queried once. Answers are merged in
//! resolver priority order regardless of which query finished first, and a
//! failing resolver only removes its own contribution.

use super::{HickoryResolver, Name, Resolve};
use crate::base::neterror::NetError;
use crate::config::{RefreshConfig, ResolverEndpoint};
use futures::future::join_all;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

/// A resolver together with the endpoint it is reported as.
#[derive(Clone)]
pub struct ResolverSlot {
    pub endpoint: ResolverEndpoint,
    pub resolver: Arc<dyn Resolve>,
}

impl ResolverSlot {
    pub fn new(endpoint: ResolverEndpoint, resolver: Arc<dyn Resolve>) -> Self {
        Self { endpoint, resolver }
    }
}

/// Queries an ordered list of resolvers and merges their answers.
#[derive(Clone)]
pub struct MultiResolver {
    slots: Vec<ResolverSlot>,
    query_timeout: Duration,
}

impl MultiResolver {
    /// Build from explicit resolvers, in priority order.
    pub fn new(slots: Vec<ResolverSlot>, query_timeout: Duration) -> Self {
        Self {
            slots,
            query_timeout,
        }
    }

    /// One hickory resolver per configured endpoint.
    pub fn from_config(config: &RefreshConfig) -> Self {
        let slots = config
            .resolvers
            .iter()
            .map(|&endpoint| {
                let resolver = HickoryResolver::for_endpoint(endpoint, config.query_timeout);
                ResolverSlot::new(endpoint, Arc::new(resolver))
            })
            .collect();
        Self::new(slots, config.query_timeout)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = ResolverEndpoint> + '_ {
        self.slots.iter().map(|slot| slot.endpoint)
    }

    /// Look up `name` on every resolver and return deduplicated candidates.
    ///
    /// An empty result means no resolver produced an address; it is not an
    /// error.
    pub async fn lookup(&self, name: &Name) -> Vec<Ipv4Addr> {
        let queries = self.slots.iter().map(|slot| self.query_one(slot, name.clone()));
        // join_all yields results in input order, not completion order
        let answers = join_all(queries).await;
        let candidates = merge_candidates(answers);

        tracing::debug!(
            domain = %name,
            count = candidates.len(),
            candidates = ?candidates,
            "collected candidates"
        );
        candidates
    }

    async fn query_one(&self, slot: &ResolverSlot, name: Name) -> Vec<Ipv4Addr> {
        let domain = name.clone();
        let result = match tokio::time::timeout(self.query_timeout, slot.resolver.resolve(name)).await
        {
            Ok(result) => result,
            Err(_) => Err(NetError::DnsTimedOut),
        };

        match result {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                tracing::debug!(
                    domain = %domain,
                    resolver = %slot.endpoint,
                    error = %e,
                    "resolver query failed"
                );
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for MultiResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiResolver")
            .field("endpoints", &self.endpoints().collect::<Vec<_>>())
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

/// Concatenate per-resolver answers, keeping the first occurrence of each
/// address.
pub fn merge_candidates<I>(answers: I) -> Vec<Ipv4Addr>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = Ipv4Addr>,
{
    let mut seen = HashSet::new();
    answers
        .into_iter()
        .flatten()
        .filter(|addr| seen.insert(*addr))
        .collect()
}
