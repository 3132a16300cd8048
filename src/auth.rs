//! Auth-domain scope catalog and token models.

pub mod scope;
pub mod token;

pub use scope::*;
pub use token::{secret::*, *};
