//! rpc-scaffold - Command-line tool for Twirp service generation.
//!
//! # Usage
//!
//! ```bash
//! rpc-scaffold [OPTIONS] <COMMAND>
//! ```
//!
//! # Examples
//!
//! Generate bindings and documentation for every service under `rpc/`:
//! ```bash
//! rpc-scaffold generate
//! ```
//!
//! Generate a single service with an explicit documentation version:
//! ```bash
//! API_VERSION=v1.2.0 rpc-scaffold generate news
//! ```
//!
//! Scaffold a new service:
//! ```bash
//! rpc-scaffold stub news Reader Fetch
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use rpc_scaffold::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("rpc-scaffold starting...");

    cli::run(args)?;

    Ok(())
}
