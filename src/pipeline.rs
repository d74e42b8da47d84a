//! The load → transform → write driver shared by every dataset.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};

use crate::{
    config::EtlConfig,
    datasets::{DATASETS, DatasetSpec},
    frame::Table,
    io_utils,
    sink::{CsvSink, DualSink, RelationalStore},
};

/// What one dataset run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub name: &'static str,
    pub rows: usize,
    pub columns: usize,
    pub output: PathBuf,
}

/// Loads and transforms one dataset without writing it anywhere.
pub fn transform_dataset(spec: &DatasetSpec, raw_dir: &Path) -> Result<Table> {
    let source = raw_dir.join(spec.source);
    let mut table = io_utils::load_table(&source)?;
    info!(
        "[{}] loaded {} row(s) x {} column(s) from {source:?}",
        spec.name,
        table.row_count(),
        table.column_count()
    );
    spec.apply(&mut table)?;
    debug!("[{}] clean columns: {}", spec.name, table.headers().iter().join(", "));
    Ok(table)
}

/// Runs one dataset end to end. Nothing is written unless the whole
/// transform succeeds.
pub fn run_dataset(
    spec: &DatasetSpec,
    raw_dir: &Path,
    sink: &mut DualSink<'_>,
) -> Result<DatasetReport> {
    let table = transform_dataset(spec, raw_dir)?;
    let output = sink.write(spec.name, &table)?;
    Ok(DatasetReport {
        name: spec.name,
        rows: table.row_count(),
        columns: table.column_count(),
        output,
    })
}

/// Runs `specs` in order, stopping at the first failure. Datasets finished
/// before the failure stay written.
pub fn run_specs(
    specs: &[DatasetSpec],
    config: &EtlConfig,
    store: &mut dyn RelationalStore,
) -> Result<Vec<DatasetReport>> {
    let mut sink = DualSink::new(CsvSink::new(&config.clean_dir), store);
    let mut reports = Vec::with_capacity(specs.len());
    for spec in specs {
        let report = run_dataset(spec, &config.raw_dir, &mut sink)
            .with_context(|| format!("Dataset '{}'", spec.name))?;
        reports.push(report);
    }
    Ok(reports)
}

/// Runs all ten datasets in their fixed order.
pub fn run_all(config: &EtlConfig, store: &mut dyn RelationalStore) -> Result<Vec<DatasetReport>> {
    run_specs(&DATASETS, config, store)
}
