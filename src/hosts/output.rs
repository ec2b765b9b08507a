//! Output lines and the regenerated hosts file.

use super::DomainEntry;
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::fmt;
use std::net::Ipv4Addr;
use std::path::Path;

/// Width the address column is padded to.
pub const ADDRESS_WIDTH: usize = 15;

/// One line of the regenerated mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Resolved { addr: Ipv4Addr, domain: DomainEntry },
    Failed { domain: DomainEntry },
}

impl OutputLine {
    pub fn domain(&self) -> &DomainEntry {
        match self {
            OutputLine::Resolved { domain, .. } | OutputLine::Failed { domain } => domain,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, OutputLine::Resolved { .. })
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Ipv4Addr's Display honors width, so pad it directly
            OutputLine::Resolved { addr, domain } => {
                write!(f, "{:<width$} {}", addr, domain, width = ADDRESS_WIDTH)
            }
            OutputLine::Failed { domain } => write!(f, "# Failed to resolve: {}", domain),
        }
    }
}

/// Join lines with `\n`, including a trailing newline.
pub fn render(lines: &[OutputLine]) -> String {
    let mut out = String::with_capacity(lines.len() * 32);
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Overwrite `path` with the rendered lines.
pub async fn write_output(path: &Path, lines: &[OutputLine]) -> Result<(), NetError> {
    tokio::fs::write(path, render(lines)).await.hosts_context(path)?;
    tracing::info!(path = %path.display(), lines = lines.len(), "wrote hosts output");
    Ok(())
}
