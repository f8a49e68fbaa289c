//! CLI command handlers, one per file.

mod config;
mod fetch;
mod profiles;

pub use config::run_config;
pub use fetch::{run_fetch, FetchArgs};
pub use profiles::run_profiles;
