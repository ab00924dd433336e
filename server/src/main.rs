// server/src/main.rs

// Entry point for the hospital CLI. Parses arguments and hands off to the
// CLI dispatcher.

use anyhow::Result;
use clap::Parser;

use hospital_cli::cli::{start_cli, CliArgs};

fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();
    start_cli(CliArgs::parse())
}
