//! Content origins
//!
//! Where responses come from when the cache does not have them:
//! - a deployed app over HTTP
//! - a local build directory
//! - nowhere (offline)

mod factory;
mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod network;
mod static_dir;

pub use factory::{create_origin, OriginKind};
pub use http::HttpOrigin;
pub use network::{content_type_for, Network, NetworkResponse, OfflineOrigin};
pub use static_dir::StaticOrigin;
