//! Provider-facing contract (behavior) and endpoint set (data).
//!
//! `contract` defines the capability traits a host authentication framework drives:
//! [`AuthSession`] for the per-attempt state and [`IdentityProvider`] for the adapter itself.
//! `endpoints` pins the fixed Xero URLs and header names used on the wire.

pub mod contract;
pub mod endpoints;

pub use contract::*;
pub use endpoints::*;
