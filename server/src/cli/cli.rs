// server/src/cli/cli.rs

// Loads configuration, sets up logging and dispatches the parsed command.
use std::sync::Arc;

use anyhow::Result;
use log::debug;

use hospital_core::{load_config, SystemClock};

use crate::cli::commands::{CliArgs, HospitalCommands};
use crate::cli::handlers::{run_demo, run_validate};
use crate::cli::handlers_queries::handle_query_command;
use crate::cli::registry::Registry;

/// Log filter precedence: `--log-level`, then `RUST_LOG`, then the config
/// file.
fn init_logging(config_level: &str, cli_level: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or(config_level);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = cli_level {
        builder.parse_filters(level);
    }
    // Already initialised when called twice in one process.
    let _ = builder.try_init();
}

pub fn start_cli(args: CliArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging.level, args.log_level.as_deref());
    debug!("Using configuration: {:?}", config);

    let registry = Registry::new(Arc::new(SystemClock));
    match args.command.unwrap_or(HospitalCommands::Demo) {
        HospitalCommands::Demo => run_demo(&registry, &config),
        HospitalCommands::Validate => run_validate(&registry, &config),
        HospitalCommands::Query {
            entity,
            field,
            value,
            text,
        } => handle_query_command(&registry, &config, entity, &field, &value, text),
    }
}
