//! Offline cache
//!
//! Responses are stored per generation, one generation per app build,
//! tagged `{name}-{version}`. The lifecycle controller installs a build's
//! generation and, on activation, removes every other one.
//!
//! # Lifecycle States
//!
//! | State | Description |
//! |-------|-------------|
//! | Parsed | Build known, nothing installed |
//! | Installing | Precache manifest being fetched |
//! | Waiting | Installed, older generation still in control |
//! | Active | Sole generation, controls clients |
//! | Redundant | Install failed |

pub mod lifecycle;
pub mod store;

pub use lifecycle::{ActivationReport, InstallReport, LifecycleController, LifecycleState};
pub use store::{format_bytes, CacheHandle, CacheStore, GenerationStats, StoredResponse};
