pub mod cli;
pub mod columns;
pub mod config;
pub mod data;
pub mod datasets;
pub mod derive;
pub mod error;
pub mod frame;
pub mod io_utils;
pub mod pipeline;
pub mod sink;
pub mod table;
pub mod transform;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{cli::Cli, config::EtlConfig, sink::SqliteStore};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("agro_etl", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = EtlConfig::resolve(&cli)?;
    execute(&config)
}

/// Runs every dataset against the store named by `config`.
pub fn execute(config: &EtlConfig) -> Result<()> {
    println!("Running ETL...");
    info!(
        "Reading from {:?}, writing CSV to {:?} and tables to '{}'",
        config.raw_dir, config.clean_dir, config.database
    );
    let location = config.store_location()?;
    let mut store = SqliteStore::open(&location)
        .with_context(|| format!("Connecting to '{}'", config.database))?;
    let reports = pipeline::run_all(config, &mut store)?;
    println!("ETL Completed.");
    table::print_reports(&reports);
    Ok(())
}
