//! DNS Resolution Module
//!
//! Provides pluggable A-record resolution with support for:
//! - Per-server hickory-dns resolvers (one upstream each, no retries)
//! - Fan-out lookup across an ordered resolver list with deduplication
//!
//! # Architecture
//!
//! The `Resolve` trait is the core abstraction that allows different
//! resolver implementations (including test doubles) to be used
//! interchangeably. [`MultiResolver`] owns one `Resolve` per upstream and
//! turns their answers into a single prioritized candidate list.
//!
//! # Example
//!
//! ```rust,ignore
//! use hostsync::config::RefreshConfig;
//! use hostsync::dns::{MultiResolver, Name};
//!
//! let multi = MultiResolver::from_config(&RefreshConfig::default());
//! for addr in multi.lookup(&Name::new("example.com")).await {
//!     println!("Candidate: {}", addr);
//! }
//! ```

mod hickory;
mod multi;
mod resolve;

pub use hickory::HickoryResolver;
pub use multi::{merge_candidates, MultiResolver, ResolverSlot};
pub use resolve::{Addrs, Name, Resolve, Resolving};
