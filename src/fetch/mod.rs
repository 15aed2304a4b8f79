//! Fetch interception
//!
//! The interceptor decides cache vs network per request; the runtime is
//! the client-side entry point that routes through whichever interceptor
//! currently controls the process.

mod interceptor;
mod runtime;

pub use interceptor::FetchInterceptor;
pub use runtime::Runtime;
