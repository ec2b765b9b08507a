use std::{io, path::PathBuf, sync::Arc};
use thiserror::Error;

/// Errors observed while refreshing a hosts mapping.
///
/// Codes follow Chromium's `net_error_list.h` where a matching entry exists.
/// Startup errors (hosts file lookup, configuration) use a custom range
/// starting at -10000 so they never collide with network codes.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Address unreachable")]
    AddressUnreachable,
    #[error("Connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },

    // DNS Errors
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name resolution failed")]
    NameResolutionFailed,
    #[error("DNS query timed out")]
    DnsTimedOut,

    // Startup Errors
    #[error("hosts file not found, searched in: {attempted:?}")]
    HostsFileNotFound { attempted: Vec<PathBuf> },
    #[error("no domains found in {path:?}")]
    HostsFileEmpty { path: PathBuf },
    #[error("failed to access {path:?}: {source}")]
    HostsFileIo {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown error ({0})")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionRefused => -102,
            NetError::ConnectionFailed | NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolved => -105,
            NetError::AddressUnreachable => -109,
            NetError::ConnectionTimedOut => -118,
            NetError::NameResolutionFailed => -137,
            NetError::DnsTimedOut => -803,
            // Custom startup codes
            NetError::HostsFileNotFound { .. } => -10000,
            NetError::HostsFileEmpty { .. } => -10001,
            NetError::HostsFileIo { .. } => -10002,
            NetError::InvalidConfig { .. } => -10003,
            NetError::Unknown(code) => *code,
        }
    }

    /// Whether this error aborts the run before any resolution work starts.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            NetError::HostsFileNotFound { .. }
                | NetError::HostsFileEmpty { .. }
                | NetError::HostsFileIo { .. }
                | NetError::InvalidConfig { .. }
        )
    }

    /// Create a connection failure error with host context.
    pub fn connection_failed_to(host: impl Into<String>, port: u16, source: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.into(),
            port,
            source: Arc::new(source),
        }
    }

    /// Create a hosts file I/O error.
    pub fn hosts_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NetError::HostsFileIo {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        NetError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<&io::Error> for NetError {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            io::ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                NetError::AddressUnreachable
            }
            _ => NetError::ConnectionFailed,
        }
    }
}
