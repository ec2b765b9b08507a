//! Per-domain resolution: collect candidates, keep the first that answers.

use crate::config::RefreshConfig;
use crate::dns::{MultiResolver, Name};
use crate::hosts::{DomainEntry, OutputLine};
use crate::socket::{Probe, TcpProber};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

/// Why a domain ended up without an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No resolver returned any address.
    NoCandidates,
    /// Candidates existed but none accepted a connection.
    NoneReachable { tried: usize },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NoCandidates => f.write_str("no addresses found from any resolver"),
            UnresolvedReason::NoneReachable { tried } => {
                write!(f, "none of {tried} candidate(s) reachable")
            }
        }
    }
}

/// Outcome for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionResult {
    Resolved(Ipv4Addr),
    Unresolved(UnresolvedReason),
}

impl ResolutionResult {
    /// Map to the output line for `domain`.
    pub fn into_line(self, domain: DomainEntry) -> OutputLine {
        match self {
            ResolutionResult::Resolved(addr) => OutputLine::Resolved { addr, domain },
            ResolutionResult::Unresolved(_) => OutputLine::Failed { domain },
        }
    }
}

/// Resolves a single domain to a reachable address.
///
/// Candidates are probed strictly in lookup order and probing stops at the
/// first success. There is no scoring: the first reachable address from the
/// highest-priority resolver wins.
pub struct DomainResolver {
    lookup: MultiResolver,
    prober: Arc<dyn Probe>,
    probe_port: u16,
    probe_timeout: Duration,
}

impl DomainResolver {
    pub fn new(
        lookup: MultiResolver,
        prober: Arc<dyn Probe>,
        probe_port: u16,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            lookup,
            prober,
            probe_port,
            probe_timeout,
        }
    }

    /// Hickory resolvers for every endpoint plus a TCP prober.
    pub fn from_config(config: &RefreshConfig) -> Self {
        Self::new(
            MultiResolver::from_config(config),
            Arc::new(TcpProber::new()),
            config.probe_port,
            config.probe_timeout,
        )
    }

    pub async fn resolve(&self, domain: &DomainEntry) -> ResolutionResult {
        tracing::info!(domain = %domain, "resolving");

        let candidates = self.lookup.lookup(&Name::new(domain.as_str())).await;
        if candidates.is_empty() {
            let reason = UnresolvedReason::NoCandidates;
            tracing::warn!(domain = %domain, "{}", reason);
            return ResolutionResult::Unresolved(reason);
        }

        for addr in &candidates {
            let reachable = self
                .prober
                .probe(*addr, self.probe_port, self.probe_timeout)
                .await;
            tracing::info!(
                domain = %domain,
                addr = %addr,
                port = self.probe_port,
                reachable,
                "probed candidate"
            );
            if reachable {
                tracing::info!(domain = %domain, addr = %addr, "resolved");
                return ResolutionResult::Resolved(*addr);
            }
        }

        let reason = UnresolvedReason::NoneReachable {
            tried: candidates.len(),
        };
        tracing::warn!(domain = %domain, "{}", reason);
        ResolutionResult::Unresolved(reason)
    }
}

impl fmt::Debug for DomainResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainResolver")
            .field("lookup", &self.lookup)
            .field("probe_port", &self.probe_port)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}
