//! Hosts mapping file handling.
//!
//! Input is the classic `ADDRESS DOMAIN [ALIASES...]` format. Only the
//! domain column matters here; the old address is discarded and replaced
//! by whatever resolves and answers today.

mod output;

pub use output::{render, write_output, OutputLine};

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A domain read from the mapping file.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct DomainEntry {
    domain: Box<str>,
}

impl DomainEntry {
    #[inline]
    pub fn new(domain: impl Into<Box<str>>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.domain
    }
}

impl From<&str> for DomainEntry {
    fn from(value: &str) -> Self {
        DomainEntry::new(value)
    }
}

impl fmt::Debug for DomainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.domain, f)
    }
}

impl fmt::Display for DomainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.domain, f)
    }
}

/// Extract domains from hosts file text.
///
/// Blank lines, `#` comments and lines with fewer than two fields are
/// skipped. Input order and duplicates are preserved.
pub fn parse(text: &str) -> Vec<DomainEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(DomainEntry::from)
        .collect()
}

/// Return the first candidate path that exists.
pub fn locate(candidates: &[PathBuf]) -> Result<PathBuf, NetError> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| NetError::HostsFileNotFound {
            attempted: candidates.to_vec(),
        })
}

/// Read and parse a hosts file. A file without any domain is an error.
pub async fn read_domains(path: &Path) -> Result<Vec<DomainEntry>, NetError> {
    let text = tokio::fs::read_to_string(path).await.hosts_context(path)?;
    let domains = parse(&text);
    if domains.is_empty() {
        return Err(NetError::HostsFileEmpty {
            path: path.to_path_buf(),
        });
    }
    tracing::info!(path = %path.display(), count = domains.len(), "read hosts file");
    Ok(domains)
}
