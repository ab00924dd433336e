// server/src/cli/commands.rs

// Command-line arguments and subcommands for the hospital CLI.
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use hospital_core::config::CONFIG_ENV_VAR;

#[derive(Parser, Debug)]
#[command(name = "hospital-cli")]
#[command(version = "0.1.0")]
#[command(about = "Hospital records and appointment scheduling")]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(long, short = 'c', value_name = "PATH", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Log filter, overrides both the config file and RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<HospitalCommands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum HospitalCommands {
    /// Seed sample data, book appointments, run the validation checks and
    /// print statistics
    Demo,
    /// Run only the booking validation checks against sample data
    Validate,
    /// Look up seeded records by field value
    Query {
        #[arg(long, value_enum)]
        entity: EntityKind,
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
        /// Compare as plain text instead of reading the value as the field's kind
        #[arg(long)]
        text: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Practitioners,
    Patients,
    Appointments,
    Rooms,
    Hospitals,
}
