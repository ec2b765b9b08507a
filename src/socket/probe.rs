use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::pin::Pin;
use std::time::Duration;
use tokio::net::TcpStream;

/// Alias for the `Future` returned by a prober.
pub type Probing = Pin<Box<dyn Future<Output = bool> + Send>>;

/// Connectivity check for a candidate address.
///
/// Returns `true` only if a connection to `addr:port` completes within
/// `timeout`. Refusals, timeouts and any other network errors all map to
/// `false`.
pub trait Probe: Send + Sync {
    fn probe(&self, addr: Ipv4Addr, port: u16, timeout: Duration) -> Probing;
}

impl<P: Probe + ?Sized> Probe for std::sync::Arc<P> {
    fn probe(&self, addr: Ipv4Addr, port: u16, timeout: Duration) -> Probing {
        (**self).probe(addr, port, timeout)
    }
}

/// TCP handshake prober. The connection is dropped as soon as it is up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

impl TcpProber {
    pub fn new() -> Self {
        Self
    }

    /// Attempt the handshake, reporting why it failed.
    pub async fn connect(addr: Ipv4Addr, port: u16, timeout: Duration) -> Result<(), NetError> {
        let target = SocketAddr::from((addr, port));
        let stream = tokio::time::timeout(timeout, TcpStream::connect(target))
            .await
            .map_err(|_| NetError::ConnectionTimedOut)?
            .connection_context(&addr.to_string(), port)?;
        drop(stream);
        Ok(())
    }
}

impl Probe for TcpProber {
    fn probe(&self, addr: Ipv4Addr, port: u16, timeout: Duration) -> Probing {
        Box::pin(async move {
            match Self::connect(addr, port, timeout).await {
                Ok(()) => {
                    tracing::debug!(addr = %addr, port, "probe succeeded");
                    true
                }
                Err(e) => {
                    let reason = match &e {
                        NetError::ConnectionFailedTo { source, .. } => NetError::from(&**source),
                        other => other.clone(),
                    };
                    tracing::debug!(addr = %addr, port, error = %e, code = reason.as_i32(), "probe failed");
                    false
                }
            }
        })
    }
}
