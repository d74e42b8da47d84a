use std::path::PathBuf;

use clap::Parser;

/// Every run processes all datasets in a fixed order; the flags only say
/// where to read from and write to.
#[derive(Debug, Default, Parser)]
#[command(
    author,
    version,
    about = "Normalize agricultural-statistics tables into CSV files and a SQLite database",
    long_about = None
)]
pub struct Cli {
    /// YAML file providing raw_dir, clean_dir and database
    #[arg(short, long, env = "AGRO_ETL_CONFIG")]
    pub config: Option<PathBuf>,
    /// Directory holding the source files (default data/raw)
    #[arg(long = "raw-dir", env = "AGRO_ETL_RAW_DIR")]
    pub raw_dir: Option<PathBuf>,
    /// Directory receiving one CSV per dataset (default data/clean)
    #[arg(long = "clean-dir", env = "AGRO_ETL_CLEAN_DIR")]
    pub clean_dir: Option<PathBuf>,
    /// Relational store connection string (default sqlite:///agro.db)
    #[arg(long, env = "AGRO_ETL_DATABASE_URL")]
    pub database: Option<String>,
}
