//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that form
//! the foundation of the DNS abstraction layer.

use crate::base::neterror::NetError;
use std::{fmt, future::Future, net::Ipv4Addr, pin::Pin, sync::Arc};

/// A domain name to resolve into IPv4 addresses.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over A record addresses.
pub type Addrs = Box<dyn Iterator<Item = Ipv4Addr> + Send>;

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Trait for DNS resolution against a single source.
///
/// Only A records are requested. Implementations must be thread-safe and
/// report every failure (timeout, NXDOMAIN, server error) as an `Err`;
/// callers decide whether a failure matters.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to IPv4 addresses, in answer order.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}
