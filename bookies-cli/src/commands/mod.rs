//! Subcommand implementations

mod migrate;
mod serve;

pub use migrate::run_migrate;
pub use serve::{run_serve, ServeArgs};
