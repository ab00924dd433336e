// server/src/cli/mod.rs

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod handlers_queries;
pub mod registry;

pub use cli::start_cli;
pub use commands::{CliArgs, EntityKind, HospitalCommands};
pub use registry::Registry;
