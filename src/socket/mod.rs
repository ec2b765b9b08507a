//! Socket-level checks.
//!
//! - [`Probe`]: connectivity check abstraction
//! - [`TcpProber`]: bounded TCP handshake against a candidate address

pub mod probe;

pub use probe::{Probe, Probing, TcpProber};
