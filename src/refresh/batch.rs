//! Batch runner over the full domain list.

use super::resolver::DomainResolver;
use crate::hosts::{DomainEntry, OutputLine};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl RunSummary {
    pub fn from_lines(lines: &[OutputLine]) -> Self {
        let resolved = lines.iter().filter(|l| l.is_resolved()).count();
        Self {
            total: lines.len(),
            resolved,
            unresolved: lines.len() - resolved,
        }
    }
}

/// Resolves every domain and assembles output lines in input order.
///
/// Each domain runs as its own task; at most `concurrency` are in flight.
/// Results land in a slot indexed by input position, so completion order
/// never affects output order.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    resolver: Arc<DomainResolver>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(resolver: Arc<DomainResolver>, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    /// One output line per entry of `domains`, same order.
    pub async fn run(&self, domains: &[DomainEntry]) -> Vec<OutputLine> {
        let limiter = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, domain) in domains.iter().cloned().enumerate() {
            let resolver = self.resolver.clone();
            let limiter = limiter.clone();
            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = limiter.acquire_owned().await.ok();
                let result = resolver.resolve(&domain).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<OutputLine>> = vec![None; domains.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    slots[index] = Some(result.into_line(domains[index].clone()));
                }
                Err(e) => tracing::error!(error = %e, "domain task failed"),
            }
        }

        // A task that died leaves its slot empty; it still gets a line
        let lines: Vec<OutputLine> = slots
            .into_iter()
            .zip(domains)
            .map(|(slot, domain)| {
                slot.unwrap_or_else(|| OutputLine::Failed {
                    domain: domain.clone(),
                })
            })
            .collect();

        let summary = RunSummary::from_lines(&lines);
        tracing::info!(
            total = summary.total,
            resolved = summary.resolved,
            unresolved = summary.unresolved,
            "batch complete"
        );
        lines
    }
}
