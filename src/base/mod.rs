//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): error codes for DNS, connectivity and
//!   startup failures
//! - [`IoResultExt`](context::IoResultExt): context helpers for `io::Result`

pub mod context;
pub mod neterror;
