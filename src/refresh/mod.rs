//! Resolution pipeline.
//!
//! [`BatchRunner`] drives one [`DomainResolver::resolve`] per domain, which
//! in turn asks the [`MultiResolver`](crate::dns::MultiResolver) for
//! candidates and probes them with a [`Probe`](crate::socket::Probe).

mod batch;
mod resolver;

pub use batch::{BatchRunner, RunSummary};
pub use resolver::{DomainResolver, ResolutionResult, UnresolvedReason};

use crate::base::neterror::NetError;
use crate::config::RefreshConfig;
use crate::hosts::{self, OutputLine};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build the production pipeline described by `config`.
pub fn pipeline(config: &RefreshConfig) -> BatchRunner {
    BatchRunner::new(
        Arc::new(DomainResolver::from_config(config)),
        config.concurrency,
    )
}

/// Result of a completed refresh.
#[derive(Debug, Clone)]
pub struct Refreshed {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lines: Vec<OutputLine>,
    pub summary: RunSummary,
}

/// Locate and read the hosts file, resolve every domain with `runner`, and
/// overwrite the output file.
///
/// Relative paths in `config` resolve against `base`. Startup failures
/// (no hosts file, no domains) return before any query is sent and leave
/// the output file untouched.
pub async fn refresh_file(
    config: &RefreshConfig,
    base: &Path,
    runner: &BatchRunner,
) -> Result<Refreshed, NetError> {
    let input = hosts::locate(&config.candidate_paths(base))?;
    let domains = hosts::read_domains(&input).await?;

    tracing::info!(
        count = domains.len(),
        resolvers = ?config.resolvers.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "resolving domains"
    );
    let lines = runner.run(&domains).await;

    let output = config.output_path_in(base);
    hosts::write_output(&output, &lines).await?;

    let summary = RunSummary::from_lines(&lines);
    Ok(Refreshed {
        input,
        output,
        lines,
        summary,
    })
}
