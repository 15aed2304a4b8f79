//! CLI command implementations

pub mod cache;
pub mod config;
pub mod fetch;
pub mod install;
pub mod list;
pub mod load;

pub use cache::execute as cache;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use install::activate;
pub use install::execute as install;
pub use list::execute as list;
pub use load::execute as load;
