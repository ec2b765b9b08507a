//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting IO errors into context-rich `NetError` variants.

use crate::base::neterror::NetError;
use std::io;
use std::path::Path;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add connection context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use hostsync::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("93.184.216.34", 443)?;
    /// // Error: "Connection to 93.184.216.34:443 failed: connection refused"
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Add hosts file path context to an IO error.
    fn hosts_context(self, path: &Path) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn hosts_context(self, path: &Path) -> Result<T, NetError> {
        self.map_err(|e| NetError::hosts_io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_connection_context() {
        let result: Result<(), io::Error> =
            Err(Error::new(ErrorKind::ConnectionRefused, "refused"));
        let err = result.connection_context("93.184.216.34", 443).unwrap_err();

        match err {
            NetError::ConnectionFailedTo { host, port, .. } => {
                assert_eq!(host, "93.184.216.34");
                assert_eq!(port, 443);
            }
            _ => panic!("Expected ConnectionFailedTo"),
        }
    }

    #[test]
    fn test_hosts_context() {
        let result: Result<(), io::Error> =
            Err(Error::new(ErrorKind::PermissionDenied, "denied"));
        let err = result.hosts_context(Path::new("/etc/hosts")).unwrap_err();

        match err {
            NetError::HostsFileIo { path, .. } => {
                assert_eq!(path, Path::new("/etc/hosts"));
            }
            _ => panic!("Expected HostsFileIo"),
        }
    }
}
