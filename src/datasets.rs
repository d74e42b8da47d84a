//! The ten source datasets and the rules applied to each.
//!
//! Every dataset goes through the same shape: canonical column names, then
//! uppercase text columns, then its own [`Step`]s in order. Whether missing
//! production/area values are zero-filled before the yield is computed
//! differs between datasets and is kept exactly as listed here; filling the
//! two seasonal-cycle datasets as well would change their published yields.

use anyhow::{Context, Result};
use log::debug;

use crate::{
    columns::normalize_columns,
    derive::{DerivedMetric, coerce_to_float, fill_missing_with_zero},
    frame::Table,
    transform::normalize_strings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Every value must convert to a float.
    CoerceFloat(&'static str),
    /// Missing values become zero.
    FillZero(&'static str),
    Derive(DerivedMetric),
    /// Silently skipped when `from` is absent.
    Rename {
        from: &'static str,
        to: &'static str,
    },
}

impl Step {
    pub fn apply(&self, table: &mut Table) -> Result<()> {
        match *self {
            Step::CoerceFloat(column) => coerce_to_float(table, column),
            Step::FillZero(column) => fill_missing_with_zero(table, column).map(|_| ()),
            Step::Derive(metric) => metric.apply(table),
            Step::Rename { from, to } => {
                if !table.rename_column(from, to)? {
                    debug!("Column '{from}' not present; nothing renamed to '{to}'");
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Output name, used for the flat file and the relational table.
    pub name: &'static str,
    /// File name relative to the raw-data directory.
    pub source: &'static str,
    pub text_columns: &'static [&'static str],
    pub steps: &'static [Step],
}

impl DatasetSpec {
    /// Turns a raw table into the clean table for this dataset.
    pub fn apply(&self, table: &mut Table) -> Result<()> {
        normalize_columns(table)?;
        normalize_strings(table, self.text_columns)
            .with_context(|| format!("Normalizing text columns of '{}'", self.name))?;
        for step in self.steps {
            step.apply(table)
                .with_context(|| format!("Applying {step:?} to '{}'", self.name))?;
        }
        Ok(())
    }
}

const YIELD: &str = "rendimiento";

pub static DATASETS: [DatasetSpec; 10] = [
    DatasetSpec {
        name: "units_irrigation",
        source: "1_unidades_riego.csv",
        text_columns: &["entidad", "municipio"],
        steps: &[Step::CoerceFloat("porcentaje_riego")],
    },
    DatasetSpec {
        name: "production_open_field",
        source: "2_produccion_cielo_abierto.csv",
        text_columns: &["entidad", "cultivo"],
        steps: &[
            Step::FillZero("superficie_cultivada"),
            Step::FillZero("produccion_ton"),
            Step::Derive(DerivedMetric::new(
                "produccion_ton",
                "superficie_cultivada",
                YIELD,
            )),
        ],
    },
    DatasetSpec {
        name: "modalidad_hidrica",
        source: "3_modalidad_hidrica.csv",
        text_columns: &["entidad", "cultivo"],
        steps: &[
            Step::FillZero("superficie_cultivada"),
            Step::FillZero("produccion"),
            Step::Derive(DerivedMetric::new(
                "produccion",
                "superficie_cultivada",
                YIELD,
            )),
        ],
    },
    DatasetSpec {
        name: "ciclo_oi",
        source: "4_ciclo_oi.csv",
        text_columns: &["entidad", "cultivo"],
        steps: &[Step::Derive(DerivedMetric::new(
            "produccion",
            "superficie",
            YIELD,
        ))],
    },
    DatasetSpec {
        name: "ciclo_pv",
        source: "5_ciclo_pv.csv",
        text_columns: &["entidad", "cultivo"],
        steps: &[Step::Derive(DerivedMetric::new(
            "produccion",
            "superficie",
            YIELD,
        ))],
    },
    DatasetSpec {
        name: "perennes",
        source: "6_perennes.csv",
        text_columns: &["entidad", "cultivo"],
        steps: &[Step::FillZero("superficie")],
    },
    DatasetSpec {
        name: "land_use",
        source: "7_uso_suelo.csv",
        text_columns: &["entidad"],
        steps: &[],
    },
    DatasetSpec {
        name: "instalaciones",
        source: "8_instalaciones.csv",
        text_columns: &["entidad", "municipio"],
        steps: &[],
    },
    DatasetSpec {
        name: "uso_suelo_upa",
        source: "9_uso_suelo_upa.csv",
        text_columns: &["entidad", "municipio"],
        steps: &[],
    },
    DatasetSpec {
        name: "tecnologia",
        source: "10_tecnologia_agricola.csv",
        text_columns: &["entidad", "municipio"],
        steps: &[Step::Rename {
            from: "porcentaje",
            to: "porcentaje_uso",
        }],
    },
];

pub fn find(name: &str) -> Option<&'static DatasetSpec> {
    DATASETS.iter().find(|spec| spec.name == name)
}
